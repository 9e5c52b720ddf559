use crate::infra::{open_store, ConfiguredStore};
use brandlife::applications::{
    ApplicationFilter, ApplicationRepository, ApplicationService, ApplicationServiceError,
};
use brandlife::config::{AppConfig, ListingConfig};
use brandlife::error::AppError;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Only export applications with this status (pending, reviewed, approved, rejected or all)
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Case-insensitive match against name, email or company
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let filter = ApplicationFilter::parse(args.status.as_deref(), args.search.as_deref())
        .map_err(ApplicationServiceError::from)?;

    let written = match open_store(&config.storage)? {
        ConfiguredStore::Memory(repository) => {
            export_with(repository, config.listing, &filter, args.output.as_deref())?
        }
        ConfiguredStore::Sqlite(repository) => {
            export_with(repository, config.listing, &filter, args.output.as_deref())?
        }
    };

    if let Some(path) = &args.output {
        eprintln!("Exported {written} applications to {}", path.display());
    }
    Ok(())
}

pub(crate) fn export_with<R>(
    repository: Arc<R>,
    listing: ListingConfig,
    filter: &ApplicationFilter,
    output: Option<&Path>,
) -> Result<usize, AppError>
where
    R: ApplicationRepository + 'static,
{
    let service = ApplicationService::new(repository, listing);
    let written = match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let written = service.export_csv(filter, &mut writer)?;
            writer.flush()?;
            written
        }
        None => service.export_csv(filter, io::stdout().lock())?,
    };
    Ok(written)
}
