pub mod gemini_service;
pub mod lightx_service;
pub mod relay_service;
