pub mod launch;

pub use launch::launch_headless_browser;
