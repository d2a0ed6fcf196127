//! diglib: command-line client for the digital library service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use diglib::client::{ClientResult, LibraryClient, Navigation, PageNavigator, DEFAULT_BASE_URL};
use diglib::models::{BookFilter, BookQuery, NewBook, SortDirection, SortField, DEFAULT_LIST_SIZE};
use diglib::PagedContent;

/// Command-line arguments for the client.
#[derive(Parser, Debug)]
#[command(name = "diglib")]
#[command(about = "Browse, read and manage books in a digital library")]
#[command(version)]
struct Cli {
    /// Base URL of the library service.
    #[arg(long, short = 'u', default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Enable debug logging.
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List books.
    List {
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_LIST_SIZE)]
        size: usize,
        /// Field to sort by (id, title, author, genre, isbn, year).
        #[arg(long, default_value = "title", value_parser = parse_sort_field)]
        sort_by: SortField,
        /// Sort descending.
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Show a book's metadata.
    Show { id: u64 },
    /// Read a book page by page.
    Read {
        id: u64,
        /// Page to show (1-based); interactive reading starts at the first page.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Characters per page; the server default applies when unset.
        #[arg(long)]
        page_size: Option<usize>,
        /// Step through pages with n/p/q on standard input.
        #[arg(long, short = 'i')]
        interactive: bool,
    },
    /// Download a book's full text into a directory.
    Download {
        id: u64,
        #[arg(long, short = 'o', default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Upload a new book.
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        year: i32,
        /// Text file with the book's content.
        content: PathBuf,
    },
    /// Delete a book.
    Delete { id: u64 },
    /// List the available genres.
    Genres,
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::from_str(s).ok_or_else(|| format!("unknown sort field '{}'", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> ClientResult<()> {
    let client = LibraryClient::new(&cli.url)?;

    match cli.command {
        Command::List {
            page,
            size,
            sort_by,
            desc,
            title,
            author,
            genre,
        } => {
            let filter = title
                .map(BookFilter::Title)
                .or(author.map(BookFilter::Author))
                .or(genre.map(BookFilter::Genre));
            let query = BookQuery {
                page,
                size,
                sort_by,
                sort_dir: if desc { SortDirection::Desc } else { SortDirection::Asc },
                filter,
            };

            let result = client.list_books(&query).await?;
            for book in &result.content {
                println!("{:>5}  {} ({}) by {}", book.id, book.title, book.year, book.author);
            }
            println!(
                "Page {} of {} ({} books)",
                result.number.saturating_add(1),
                result.total_pages.max(1),
                result.total_elements
            );
        }
        Command::Show { id } => {
            let book = client.get_book(id).await?;
            println!("{}", book.metadata());
        }
        Command::Read {
            id,
            page,
            page_size,
            interactive,
        } => {
            if interactive {
                read_interactive(client, id, page_size).await?;
            } else {
                let content = client.read_page(id, page.saturating_sub(1), page_size).await?;
                print_page(&content);
            }
        }
        Command::Download { id, dir, page_size } => {
            let book = client.get_book(id).await?;
            let path = client.download_book(&book, &dir, page_size).await?;
            println!("Saved '{}' to {}", book.title, path.display());
        }
        Command::Upload {
            title,
            author,
            genre,
            isbn,
            year,
            content,
        } => {
            let book = NewBook {
                title,
                author,
                genre,
                isbn,
                year,
            };
            let id = client.post_book(&book, &content).await?;
            println!("ID:{}", id);
        }
        Command::Delete { id } => {
            if client.delete_book(id).await? {
                println!("Book deleted successfully");
            } else {
                println!("Book {} not found", id);
            }
        }
        Command::Genres => {
            for genre in client.genres().await? {
                println!("{}", genre);
            }
        }
    }

    Ok(())
}

fn print_page(page: &PagedContent) {
    println!("{}", page.content());
    println!();
    println!("{}", page.summary());
}

async fn read_interactive(client: LibraryClient, id: u64, page_size: Option<usize>) -> ClientResult<()> {
    let navigator = PageNavigator::new(Arc::new(client), page_size);
    if let Navigation::Applied(page) = navigator.open(id).await? {
        print_page(&page);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("[n]ext, [p]revious, [q]uit> ");
    while let Some(line) = lines.next_line().await? {
        let result = match line.trim() {
            "n" | "" => navigator.next_page().await,
            "p" => navigator.prev_page().await,
            "q" => break,
            other => {
                eprintln!("unknown command '{}'", other);
                Ok(Navigation::Unchanged)
            }
        };
        match result {
            Ok(Navigation::Applied(page)) => print_page(&page),
            Ok(_) => {}
            Err(_) => {
                if let Some(message) = navigator.last_error() {
                    eprintln!("{}", message);
                }
            }
        }
        eprint!("[n]ext, [p]revious, [q]uit> ");
    }

    Ok(())
}
