//! CLI entry point for blogpub

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogpub::commands::PostInput;
use blogpub::server::LaunchOptions;

#[derive(Parser)]
#[command(name = "blogpub")]
#[command(version)]
#[command(about = "Compose blog posts and publish them into a static index.html", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Post fields shared by `publish` and `preview`
#[derive(Args)]
struct PostArgs {
    /// Post title
    #[arg(short, long)]
    title: Option<String>,

    /// Post category (one of the configured categories)
    #[arg(short, long)]
    category: Option<String>,

    /// Comma separated tags
    #[arg(long)]
    tags: Option<String>,

    /// Read the content from a file (`-` for stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Edit the content in $VISUAL / $EDITOR
    #[arg(short, long)]
    edit: bool,
}

impl From<PostArgs> for PostInput {
    fn from(args: PostArgs) -> Self {
        Self {
            title: args.title,
            category: args.category,
            tags: args.tags,
            file: args.file,
            edit: args.edit,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the draft and insert it into the site document
    #[command(alias = "p")]
    Publish {
        #[command(flatten)]
        post: PostArgs,

        /// Do not commit or push
        #[arg(long)]
        no_git: bool,
    },

    /// Preview the draft as HTML in the browser, or as text
    Preview {
        #[command(flatten)]
        post: PostArgs,

        /// Print a plain-text preview instead
        #[arg(long)]
        text: bool,

        /// Only write the preview file
        #[arg(short, long)]
        no_browser: bool,
    },

    /// List posts in the site document
    #[command(alias = "ls")]
    List,

    /// Start a local preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,

        /// Do not open the browser
        #[arg(short, long)]
        no_browser: bool,
    },

    /// Serve the site directory (run by `serve` in a child process)
    #[command(hide = true)]
    ServeStatic {
        #[arg(long)]
        root: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        ip: String,

        #[arg(long, default_value = "8000")]
        port: u16,

        /// Shut down when stdin is closed
        #[arg(long)]
        stop_on_eof: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogpub=debug,tower_http=debug,info"
    } else {
        "blogpub=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Determine site directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Publish { post, no_git } => {
            let blog = blogpub::Blog::new(&base_dir)?;
            blogpub::commands::publish::run(&blog, &post.into(), !no_git)?;
        }

        Commands::Preview {
            post,
            text,
            no_browser,
        } => {
            let blog = blogpub::Blog::new(&base_dir)?;
            blogpub::commands::preview::run(&blog, &post.into(), text, !no_browser)?;
        }

        Commands::List => {
            let blog = blogpub::Blog::new(&base_dir)?;
            blogpub::commands::list::run(&blog)?;
        }

        Commands::Serve {
            port,
            ip,
            no_browser,
        } => {
            let blog = blogpub::Blog::new(&base_dir)?;
            let options = LaunchOptions {
                ip: ip.unwrap_or_else(|| blog.config.server.ip.clone()),
                port: port.unwrap_or(blog.config.server.port),
                open: !no_browser,
                debug: cli.debug,
            };

            println!("Site directory: {:?}", blog.base_dir);
            tracing::info!("Starting server at http://{}:{}", options.ip, options.port);
            blogpub::server::launch(&blog.base_dir, &options).await?;
        }

        Commands::ServeStatic {
            root,
            ip,
            port,
            stop_on_eof,
        } => {
            blogpub::server::serve_static(root, &ip, port, stop_on_eof).await?;
        }
    }

    Ok(())
}
