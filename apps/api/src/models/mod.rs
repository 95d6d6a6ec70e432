pub mod files;
pub mod run;
