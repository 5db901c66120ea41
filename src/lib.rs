//! Knowledge checks for course sections: single-shot inline checks, FAQ
//! accordions and scored end-of-section quizzes, served over Telegram.

pub mod config;
pub mod error;
pub mod quiz;
pub mod render;
pub mod section;
