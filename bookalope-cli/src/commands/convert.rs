//! Convert command implementation

use super::Server;
use anyhow::{bail, Context, Result};
use bookalope_core::{
    Book, BookalopeClient, Bookflow, ConversionStatus, CreditType, DocumentType, Step, Style,
};
use clap::Args;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args)]
pub struct ConvertArgs {
    /// Manuscript document to convert
    document: PathBuf,

    /// Book title
    #[arg(long)]
    title: Option<String>,

    /// Name of the book's author
    #[arg(long)]
    author: Option<String>,

    /// Cover image file
    #[arg(long, value_name = "FILE")]
    cover: Option<PathBuf>,

    /// Target format; repeat for several (default: every export format)
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<String>,

    /// Design style short name, must exist for every target format
    #[arg(long)]
    style: Option<String>,

    /// Credit to spend on the conversion (basic, pro); without one the
    /// server produces test versions
    #[arg(long)]
    credit: Option<CreditType>,

    /// Hint for the document's type (doc, epub, gutenberg)
    #[arg(long)]
    document_type: Option<DocumentType>,

    /// Skip the structure analysis of the document
    #[arg(long)]
    skip_analysis: bool,

    /// Directory for the converted files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Delay between status polls in milliseconds
    #[arg(long, default_value = "2000")]
    poll_interval_ms: u64,

    /// Give up after this many seconds
    #[arg(long, default_value = "600")]
    timeout: u64,

    /// Keep the book on the server instead of deleting it afterwards
    #[arg(long)]
    keep: bool,
}

impl ConvertArgs {
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Convert a document with Bookalope and download the results
pub async fn convert(server: &Server, args: &ConvertArgs) -> Result<()> {
    let document = tokio::fs::read(&args.document)
        .await
        .with_context(|| format!("Failed to read document: {}", args.document.display()))?;
    let cover = match &args.cover {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read cover image: {}", path.display()))?,
        ),
        None => None,
    };
    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                args.output_dir.display()
            )
        })?;

    let client = server.client()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Creating book and bookflow...");
    let mut book = client
        .create_book(args.title.as_deref(), None)
        .await
        .context("Failed to create book")?;

    let timeout = Duration::from_secs(args.timeout);
    let result = match tokio::time::timeout(
        timeout,
        run(&client, &mut book, args, &document, cover.as_deref(), &pb),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "Conversion did not finish within {} seconds",
            args.timeout
        )),
    };

    if args.keep {
        tracing::info!("Keeping book {} on the server", book.id());
    } else {
        pb.set_message("Deleting book and all bookflows...");
        if let Err(e) = book.delete().await {
            tracing::warn!("Failed to delete book {}: {}", book.id(), e);
        }
    }

    match result {
        Ok(written) => {
            pb.finish_with_message(format!("Converted {} formats", written.len()));
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message("Conversion failed");
            Err(e)
        }
    }
}

/// Drive one bookflow from upload to downloaded conversions
async fn run(
    client: &BookalopeClient,
    book: &mut Book,
    args: &ConvertArgs,
    document: &[u8],
    cover: Option<&[u8]>,
    pb: &ProgressBar,
) -> Result<Vec<PathBuf>> {
    let bookflow = book
        .create_bookflow(None, args.title.as_deref())
        .await
        .context("Failed to create bookflow")?;

    if let Some(author) = &args.author {
        bookflow.set_author(author.as_str());
        bookflow.save().await.context("Failed to save book information")?;
    }

    pb.set_message("Uploading document...");
    bookflow
        .set_document(
            &file_name(&args.document)?,
            document,
            args.document_type,
            args.skip_analysis,
        )
        .await
        .context("Failed to upload document")?;

    pb.set_message("Analysing document...");
    wait_for_analysis(bookflow, args.poll_interval()).await?;

    if let (Some(bytes), Some(path)) = (cover, &args.cover) {
        pb.set_message("Uploading cover image...");
        bookflow
            .set_cover_image(&file_name(path)?, bytes)
            .await
            .context("Failed to upload cover image")?;
    }

    if let Some(credit) = args.credit {
        bookflow
            .set_credit(credit)
            .await
            .with_context(|| format!("Failed to assign a {} credit", credit))?;
    }

    let formats = if args.formats.is_empty() {
        client
            .export_formats()
            .await
            .context("Failed to fetch export formats")?
            .into_iter()
            .map(|format| format.name)
            .collect()
    } else {
        args.formats.clone()
    };
    if formats.is_empty() {
        bail!("The server offers no export formats");
    }

    let mut styles = Vec::with_capacity(formats.len());
    for format in &formats {
        styles.push(resolve_style(client, format, args.style.as_deref()).await?);
    }

    pb.set_message(format!("Converting to {}...", formats.join(", ")));
    let bookflow: &Bookflow = bookflow;
    let jobs = formats.iter().zip(&styles).map(|(format, style)| {
        convert_format(
            bookflow,
            format,
            style.as_ref(),
            args.poll_interval(),
            &args.output_dir,
        )
    });

    let mut written = Vec::new();
    let mut errors = 0;
    for (format, result) in formats.iter().zip(join_all(jobs).await) {
        match result {
            Ok(path) => written.push(path),
            Err(e) => {
                errors += 1;
                tracing::error!("Failed to convert to {}: {:#}", format, e);
            }
        }
    }

    if errors > 0 {
        bail!("{} of {} conversions failed", errors, formats.len());
    }

    Ok(written)
}

/// Poll the bookflow until the server finished analysing the document
async fn wait_for_analysis(bookflow: &mut Bookflow, interval: Duration) -> Result<()> {
    while bookflow.is_processing() {
        tokio::time::sleep(interval).await;
        bookflow
            .update()
            .await
            .context("Failed to refresh bookflow")?;
    }

    match bookflow.step() {
        Step::Convert => {
            tracing::info!("Bookflow {} is ready for conversion", bookflow.id());
            Ok(())
        }
        Step::ProcessingFailed => bail!("Bookalope failed to analyse the document"),
        step => bail!("Bookflow is in unexpected step '{}' after upload", step),
    }
}

/// Look up the requested style for a format; `None` means the server default
async fn resolve_style(
    client: &BookalopeClient,
    format: &str,
    short_name: Option<&str>,
) -> Result<Option<Style>> {
    let Some(short_name) = short_name else {
        return Ok(None);
    };

    let style = client
        .style(format, short_name)
        .await
        .with_context(|| format!("Failed to fetch styles for {}", format))?
        .with_context(|| format!("Style '{}' is not available for {}", short_name, format))?;
    Ok(Some(style))
}

/// Request one conversion, wait for it and write the result to disk
async fn convert_format(
    bookflow: &Bookflow,
    format: &str,
    style: Option<&Style>,
    interval: Duration,
    output_dir: &Path,
) -> Result<PathBuf> {
    bookflow
        .convert(format, style)
        .await
        .with_context(|| format!("Failed to request {} conversion", format))?;

    let mut previous = ConversionStatus::None;
    loop {
        tokio::time::sleep(interval).await;
        let status = bookflow.convert_status(format).await?;
        if !status.can_follow(previous) {
            tracing::warn!(
                "Conversion to {} went from '{}' to '{}'",
                format,
                previous,
                status
            );
        }
        previous = status;

        match status {
            ConversionStatus::Available => break,
            ConversionStatus::Failed => bail!("Bookalope failed to convert to {}", format),
            ConversionStatus::None | ConversionStatus::Processing => {}
        }
    }

    let bytes = bookflow.convert_download(format).await?;
    let path = output_dir.join(format!("{}.{}", bookflow.id(), format));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Downloaded {} ({} bytes) -> {:?}", format, bytes.len(), path);
    Ok(path)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("Could not determine file name of {}", path.display()))
}
