mod args;

pub use args::CommandArgs;
