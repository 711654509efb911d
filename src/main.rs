use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use duel_core::interface::{RandomSource, RngSource};
use duel_core::{
    Algorithm, Match, MatchConfig, MoveSelector, Phase, SearchOptions, Side, TurnResult, Winner,
};

/// Multiplication duel against a minimax opponent.
#[derive(Debug, Parser)]
#[command(name = "duel", version, about)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play against the computer in the terminal.
    Play(PlayArgs),
    /// Let two selectors play each other and report the results.
    Simulate(SimulateArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Minimax,
    AlphaBeta,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Minimax => Algorithm::Minimax,
            AlgorithmArg::AlphaBeta => Algorithm::AlphaBeta,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Human,
    Computer,
}

impl From<SideArg> for Side {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Human => Side::Human,
            SideArg::Computer => Side::Computer,
        }
    }
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Starting number, 25 to 40.
    #[arg(long, value_name = "N")]
    start: u64,

    #[arg(long, value_enum, default_value = "human")]
    first: SideArg,

    #[arg(long, value_enum, default_value = "minimax")]
    algorithm: AlgorithmArg,

    /// Seed the computer's random draws.
    #[arg(long)]
    seed: Option<u64>,

    /// Log the computer's candidate values after each search (info level).
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Algorithm of the computer seat.
    #[arg(long, value_enum, default_value = "alpha-beta")]
    algorithm: AlgorithmArg,

    /// Algorithm of the selector standing in for the human.
    #[arg(long, value_enum, default_value = "minimax")]
    human_algorithm: AlgorithmArg,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads. Defaults to the number of CPUs.
    #[arg(long)]
    threads: Option<usize>,
}

fn human_play(
    game: &mut Match,
    hint: &MoveSelector,
    rng: &mut dyn RandomSource,
) -> Result<TurnResult> {
    let mut input = String::new();
    print!("enter a multiplier (2, 3, 4, or ? for a hint): ");
    std::io::stdout().flush().context("flushing stdout")?;
    loop {
        input.clear();
        if std::io::stdin().read_line(&mut input).context("reading stdin")? == 0 {
            bail!("stdin closed before the match ended");
        }
        let input = input.trim();
        if input == "?" {
            let decision = game.suggest_move(hint, rng)?;
            println!("hint: {}", decision.multiplier);
            continue;
        }
        match input.parse::<u64>().map(|m| game.submit_human_move(m)) {
            Ok(Ok(result)) => return Ok(result),
            Ok(Err(err)) => println!("{err}, re enter:"),
            Err(_) => println!("error input, re enter:"),
        }
    }
}

fn report(result: &TurnResult) {
    let who = match result.mover {
        Side::Human => "You",
        Side::Computer => "AI",
    };
    match &result.decision {
        Some(decision) if decision.is_rogue() => {
            println!("AI Goes Rogue! {}", result.multiplier)
        }
        _ => println!("{} played {}", who, result.multiplier),
    }
    for twist in &result.twists {
        println!("{twist}");
    }
    if let Some(award) = result.bank_award {
        println!("{} takes the bank: +{}", who, award);
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let mut search = SearchOptions::default().with_algorithm(args.algorithm.into());
    if args.verbose {
        search = search.verbose();
    }
    let config = MatchConfig::new(args.start, args.first.into(), args.algorithm.into())
        .with_search(search);
    let mut game = Match::with_config(config)?;
    let hint = MoveSelector::new(SearchOptions::default().with_rogue_probability(0.0))?;
    let mut rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::thread()),
    };

    println!("Duel Begins!\n{}", game.state());
    let winner = loop {
        let result = match game.phase() {
            Phase::AwaitingHumanMove => human_play(&mut game, &hint, rng.as_mut())?,
            Phase::AwaitingComputerMove => game.request_computer_move(rng.as_mut())?,
            Phase::GameOver(winner) => break winner,
        };
        report(&result);
        println!("{}", result.state);
    };

    println!("Game Over! {winner}");
    println!("moves: {:?}", game.history());
    Ok(())
}

/// Plays one match with both seats automated.
fn play_auto(index: u64, args: &SimulateArgs, human: &MoveSelector) -> Result<(Winner, usize)> {
    let first = if index % 2 == 0 { Side::Human } else { Side::Computer };
    let start = 25 + index % 16;
    let mut game = Match::start(start, first, args.algorithm.into())?;
    let mut rng = RngSource::seeded(args.seed.wrapping_add(index));
    loop {
        match game.phase() {
            Phase::AwaitingHumanMove => {
                let decision = game.suggest_move(human, &mut rng)?;
                game.submit_human_move(decision.multiplier.get())?;
            }
            Phase::AwaitingComputerMove => {
                game.request_computer_move(&mut rng)?;
            }
            Phase::GameOver(winner) => return Ok((winner, game.history().len())),
        }
    }
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let threads = args.threads.unwrap_or_else(num_cpus::get);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("building thread pool")?;
    let human = MoveSelector::new(
        SearchOptions::default().with_algorithm(args.human_algorithm.into()),
    )?;

    let results = pool.install(|| {
        (0..args.games)
            .into_par_iter()
            .map(|i| play_auto(i, &args, &human))
            .collect::<Result<Vec<_>>>()
    })?;

    let count = |w: Winner| results.iter().filter(|(winner, _)| *winner == w).count();
    let turns: usize = results.iter().map(|(_, turns)| turns).sum();
    println!(
        "{} games on {} threads: computer ({:?}) {} / human seat ({:?}) {} / draws {}",
        results.len(),
        threads,
        args.algorithm,
        count(Winner::Computer),
        args.human_algorithm,
        count(Winner::Human),
        count(Winner::Draw),
    );
    if !results.is_empty() {
        println!("average length: {:.1} moves", turns as f64 / results.len() as f64);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play(args) => play(args),
        Command::Simulate(args) => simulate(args),
    }
}
