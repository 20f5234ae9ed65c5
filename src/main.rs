use clap::{Parser, Subcommand};
use lab_site::collection::{NEWS_PATH, PUBLICATIONS_PATH, load_news, load_publications};
use lab_site::search::{NEWS_FIELDS, PUBLICATION_FIELDS};
use lab_site::source::{ContentSource, DirSource, HttpSource, LoadError, Loader};
use lab_site::view::CollectionView;
use lab_site::{config, generate, news, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lab-site")]
#[command(about = "Static site generator for a research lab")]
#[command(long_about = "\
Static site generator for a research lab

Publications, news and the team roster are static content files. Pages are
markdown. The same content can be read from a local directory or from an
already-published site (--url).

Content structure:

  content/
  ├── config.toml                        # Site config (optional)
  ├── publications.json                  # Harvested publications, grouped by year
  ├── news.json                          # Compiled news (see compile-news)
  ├── data/
  │   ├── team/
  │   │   └── postdocs/
  │   │       ├── index.json             # [\"jane-doe.txt\", ...]
  │   │       ├── jane-doe.txt           # name, title, interests, scholar link
  │   │       └── jane-doe.jpg           # optional photo
  │   └── news/
  │       ├── index.json                 # [\"03-05-24.md\", ...]
  │       ├── 03-05-24.md                # one post per date
  │       └── 03-05-24.jpg               # optional image
  ├── pages/
  │   ├── home.md                        # home page intro
  │   └── 010-research.md                # numbered = shown in nav
  └── assets/                            # copied to the output as-is

Run 'lab-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory (also where config.toml is read from)
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Read content from a published site instead of the content directory
    #[arg(long, global = true)]
    url: Option<String>,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the full static site
    Build,
    /// Load all content and report what was found, failing on broken collections
    Check,
    /// Search publications (or news) the same way the site's search box does
    Search {
        term: String,
        /// Search news instead of publications
        #[arg(long)]
        news: bool,
        /// Restrict to one year
        #[arg(long)]
        year: Option<i32>,
    },
    /// List the most recent publications (or news)
    Recent {
        /// List news instead of publications
        #[arg(long)]
        news: bool,
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
    /// Compile data/news/*.md posts into news.json
    CompileNews,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lab_site=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_source(
    cli: &Cli,
    site_config: &config::SiteConfig,
) -> Result<Box<dyn ContentSource>, LoadError> {
    match &cli.url {
        Some(url) => Ok(Box::new(HttpSource::new(url, site_config.fetch.timeout())?)),
        None => Ok(Box::new(DirSource::new(&cli.source))),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.source)?;
    let source = open_source(&cli, &site_config)?;
    let loader = Loader::new(source.as_ref());

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} \u{2192} {}",
                source.describe(),
                cli.output.display()
            );
            let build = generate::generate(loader, site_config, &cli.output).await?;
            output::print_build_output(&build);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site = generate::load_site(loader, site_config).await?;
            output::print_check_output(&site, &source.describe());
            if site.has_errors() {
                return Err("content has errors".into());
            }
            println!("==> Content is valid");
        }
        Command::Search {
            term,
            news: in_news,
            year,
        } => {
            let view = CollectionView {
                selected_year: year,
                ..CollectionView::default()
            }
            .with_search(term.clone());
            let lines = if in_news {
                let collection = load_news(loader, NEWS_PATH).await?;
                let results = view.listing(&collection, NEWS_FIELDS).into_items();
                output::format_news_results(&term, &results)
            } else {
                let collection = load_publications(loader, PUBLICATIONS_PATH).await?;
                let results = view.listing(&collection, PUBLICATION_FIELDS).into_items();
                output::format_publication_results(&term, &results)
            };
            output::print_lines(&lines);
        }
        Command::Recent {
            news: in_news,
            count,
        } => {
            let lines = if in_news {
                let collection = load_news(loader, NEWS_PATH).await?;
                output::format_recent_news(&collection.most_recent(count))
            } else {
                let collection = load_publications(loader, PUBLICATIONS_PATH).await?;
                output::format_recent_publications(&collection.most_recent(count))
            };
            output::print_lines(&lines);
        }
        Command::CompileNews => {
            if cli.url.is_some() {
                return Err("compile-news writes into the content directory; drop --url".into());
            }
            let generated_at = chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string();
            let compiled = news::compile_news(loader, &generated_at).await?;
            let path = cli.source.join(NEWS_PATH);
            news::write_news(&compiled.collection, &path)?;
            output::print_news_output(&compiled, &path);
        }
        // Printed before any content is loaded.
        Command::GenConfig => {}
    }

    Ok(())
}
