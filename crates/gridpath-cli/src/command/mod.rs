use clap::{Parser, Subcommand};

use self::{play::PlayArg, solve::SolveArg, train::TrainArg};

mod play;
mod solve;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a navigator network with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Replay a trained model on one start/goal pair
    Solve(#[clap(flatten)] SolveArg),
    /// Place start and goal interactively and watch a trained model walk
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
