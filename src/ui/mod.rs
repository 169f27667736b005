pub mod face;
pub mod framebuffer;
pub mod pages;
pub mod screens;
