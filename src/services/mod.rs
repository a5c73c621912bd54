pub mod image_service;
pub mod prompt_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use image_service::ImageService;
pub use prompt_service::PromptService;
