use std::io::{BufWriter, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cotools::{
    DataDir,
    Downloader,
    Paperset,
    Selected,
    cli::{Cli, Command, DirArgs, GetArgs, SearchArgs, TextsArgs},
    error,
    search::{self, Queries},
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("COTOOLS_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Command::Download(args) => {
            let data_dir = DataDir::resolve(args.dir.as_deref())?;
            let extracted = Downloader::new()?
                .progress(!args.no_progress)
                .download(data_dir.root())?;
            eprintln!(
                "Downloaded into {} ({} archive(s) extracted)",
                data_dir.root().display(),
                extracted.len()
            );
        }
        Command::Count(args) => {
            let papers = open(&args)?;
            writeln!(out, "{}", papers.len())?;
        }
        Command::Get(args) => cmd_get(&mut out, &args)?,
        Command::Texts(args) => cmd_texts(&mut out, &args)?,
        Command::Search(args) => cmd_search(&mut out, &args)?,
        Command::Meta(args) => {
            let papers = Paperset::new(&args.dir)?;
            papers.get_metadata()?.write_csv(&mut out)?;
        }
        Command::Completions(args) => args.generate(),
    }

    out.flush()?;
    Ok(())
}

fn open(args: &DirArgs) -> error::Result<Paperset> {
    if args.sorted {
        Paperset::sorted(&args.dir)
    } else {
        Paperset::new(&args.dir)
    }
}

fn cmd_get(out: &mut impl Write, args: &GetArgs) -> error::Result<()> {
    let papers = open(&args.paperset)?;
    match papers.select(args.selection)? {
        Selected::One(record) => {
            serde_json::to_writer_pretty(&mut *out, &record)?;
        }
        Selected::Many(records) => {
            serde_json::to_writer_pretty(&mut *out, &records)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn cmd_texts(out: &mut impl Write, args: &TextsArgs) -> error::Result<()> {
    let papers = open(&args.paperset)?;
    let texts = if args.abstracts {
        papers.abstracts()?
    } else {
        papers.texts()?
    };

    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            writeln!(out, "\x0c")?;
        }
        writeln!(out, "{text}")?;
    }
    Ok(())
}

fn cmd_search(out: &mut impl Write, args: &SearchArgs) -> error::Result<()> {
    let papers = open(&args.paperset)?;
    let queries = Queries::new(&args.queries);
    let results = search::search(&papers, queries.clone())?;

    if args.json {
        search::format_json(out, &results, &queries)
    } else if args.files {
        search::format_files(out, &results)
    } else {
        search::format_human(out, &results)
    }
}
