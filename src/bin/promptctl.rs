use clap::{Parser, Subcommand, ValueEnum};
use prompt_image_api::azure::{AzureClient, Generator};
use prompt_image_api::store::{next_id, PromptStatus};
use prompt_image_api::{build_services, utils, Config, PathManager};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "promptctl", about = "CLI for the prompt and image approval API", version)]
struct Cli {
    /// Override DATA_DIR
    #[arg(global = true, long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prompt generation and listing
    Prompts {
        #[command(subcommand)]
        cmd: PromptsCmd,
    },
    /// Image generation and approval
    Image {
        #[command(subcommand)]
        cmd: ImageCmd,
    },
}

#[derive(Subcommand, Debug)]
enum PromptsCmd {
    /// Generate prompts for a topic and store them as pending
    Generate {
        #[arg(long)]
        topic: String,
        /// Number of prompts (1-20)
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Print stored prompts
    List {
        /// Only show prompts in this state
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[derive(Subcommand, Debug)]
enum ImageCmd {
    /// Generate the image for a stored prompt
    Generate {
        #[arg(long)]
        id: String,
        /// Use this text instead of the stored prompt
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Approve (default) or reject a generated image
    Approve {
        #[arg(long)]
        id: String,
        #[arg(long)]
        reject: bool,
    },
    /// Generate one image to the ingest folder without touching the store
    Smoke {
        #[arg(
            long,
            default_value = "A serene landscape with a mountain lake at sunset, surrounded by pine trees, in a photorealistic style"
        )]
        prompt: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Pending,
    Generated,
    Approved,
    Rejected,
}

impl From<StatusArg> for PromptStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Pending => PromptStatus::Pending,
            StatusArg::Generated => PromptStatus::Generated,
            StatusArg::Approved => PromptStatus::Approved,
            StatusArg::Rejected => PromptStatus::Rejected,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    let mut conf = Config::new()?;
    if let Some(dir) = cli.data_dir {
        conf.data_dir = dir;
    }
    let paths = PathManager::new(conf.data_dir.clone());
    paths.ensure_directories()?;
    utils::logging::init(&paths.log_dir())?;

    let generator = Arc::new(AzureClient::new(&conf, &paths)?);
    let (prompts, images) = build_services(&conf, &paths, generator.clone());

    match cli.command {
        Commands::Prompts { cmd } => match cmd {
            PromptsCmd::Generate { topic, count } => {
                let first_new = next_id(&prompts.load().await?);
                let all = prompts.generate_prompts(&topic, count).await?;
                let fresh = all
                    .iter()
                    .filter(|(id, _)| id.parse::<u64>().map_or(false, |n| n >= first_new));
                for (id, record) in fresh {
                    println!("{}\t{}", id, record.prompt);
                }
            }
            PromptsCmd::List { status } => {
                let listed = prompts.list(status.map(PromptStatus::from)).await?;
                for (id, record) in listed.iter() {
                    let image = record.image_path.as_deref().unwrap_or("-");
                    println!("{}\t{}\t{}\t{}", id, record.status, image, record.prompt);
                }
            }
        },
        Commands::Image { cmd } => match cmd {
            ImageCmd::Generate { id, prompt } => {
                let text = match prompt {
                    Some(p) => p,
                    None => match prompts.get(&id).await? {
                        Some(record) => record.prompt,
                        None => {
                            eprintln!("No prompt with id {}", id);
                            std::process::exit(2);
                        }
                    },
                };
                let path = images.generate_image(&id, &text).await?;
                println!("{}", path.display());
            }
            ImageCmd::Approve { id, reject } => {
                if images.approve_image(&id, !reject).await? {
                    println!("Image {} {}", id, if reject { "rejected" } else { "approved" });
                } else {
                    eprintln!("No prompt with id {}", id);
                    std::process::exit(2);
                }
            }
            ImageCmd::Smoke { prompt } => {
                tracing::info!(prompt = %prompt, "Starting image generation smoke test");
                let path = generator.generate_image(&prompt, None, &conf.image).await?;
                println!("{}", path.display());
            }
        },
    }
    Ok(())
}
