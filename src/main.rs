//! Runs the location list against a local record file.
//!
//! Arguments are applied in order before the first page is reported:
//! `field=value` sets a filter (`name`, `address`, `vaccineType`,
//! `startDate`, `closingDate`, `archived`), `page=N` (or `page=First|Previous|Next|Last`) moves between pages,
//! `sort=field[:asc|desc]` sorts, `recordsPerPage=N` resizes pages, `clear`
//! resets the filters, and `new-location`, `setup-wizard`, `view=<id>` run a
//! navigation action.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use dotenvy::dotenv;
use tokio::sync::broadcast::error::RecvError;

use location_search::domain::location::LocationField;
use location_search::domain::sort::{SortDirection, SortSpec};
use location_search::domain::types::{LocationId, TypeConstraintError};
use location_search::dto::list::ListEvent;
use location_search::forms::filters::FilterInput;
use location_search::models::config::ListConfig;
use location_search::pagination::PageAction;
use location_search::repository::{
    JsonFileFilterStore, LogNavigator, LogNotifier, PicklistReader, StaticLocationSource,
    StaticPicklistSource,
};
use location_search::services::list::LocationList;
use location_search::services::runtime::{LocationListHandle, spawn};
use location_search::services::{ServiceResult, navigation};

fn parse_sort(raw: &str) -> ServiceResult<SortSpec> {
    let (field, direction) = raw.split_once(':').unwrap_or((raw, "asc"));
    let field: LocationField = field.parse()?;
    let direction: SortDirection = direction.parse()?;
    Ok(SortSpec::new(field, direction))
}

async fn apply_argument(handle: &LocationListHandle, arg: &str) -> ServiceResult<()> {
    let navigator = LogNavigator;
    match arg.split_once('=') {
        None if arg == "clear" => handle.clear().await,
        None if arg == "new-location" => navigation::create_new_location(&navigator),
        None if arg == "setup-wizard" => navigation::open_setup_wizard(&navigator),
        Some(("view", id)) => navigation::view_location(&navigator, LocationId::new(id)?),
        Some(("page", page)) => {
            let action = match PageAction::from_label(page) {
                Some(action) => action,
                None => PageAction::GoTo(page.trim().parse().map_err(|_| {
                    TypeConstraintError::InvalidValue(format!("invalid page `{page}`"))
                })?),
            };
            handle.navigate(action).await
        }
        Some(("sort", spec)) => handle.sort_by(parse_sort(spec)?).await,
        Some(("recordsPerPage", size)) => handle.set_records_per_page(size).await.map(|_| ()),
        _ => handle.key_up(FilterInput::parse_pair(arg)?).await,
    }
}

/// Waits until no event arrived for `quiet`.
async fn settle(events: &mut tokio::sync::broadcast::Receiver<ListEvent>, quiet: Duration) {
    loop {
        match tokio::time::timeout(quiet, events.recv()).await {
            Ok(Ok(ListEvent::FetchFailed(message))) => {
                log::warn!("Fetch failed: {message}");
            }
            Ok(Ok(_)) | Ok(Err(RecvError::Lagged(_))) => {}
            Ok(Err(RecvError::Closed)) | Err(_) => break,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let list_config = match settings.try_deserialize::<ListConfig>() {
        Ok(list_config) => list_config,
        Err(err) => {
            log::error!("Error loading list config: {err}");
            std::process::exit(1);
        }
    };

    let list_settings = match list_config.list_settings() {
        Ok(list_settings) => list_settings,
        Err(err) => {
            log::error!("Invalid records_per_page `{}`: {err}", list_config.records_per_page);
            std::process::exit(1);
        }
    };

    let source = match StaticLocationSource::from_json_file(&list_config.locations_file) {
        Ok(source) => source,
        Err(err) => {
            log::error!(
                "Failed to load locations from {}: {err}",
                list_config.locations_file
            );
            std::process::exit(1);
        }
    };
    log::info!("Loaded {} locations", source.len());
    let picklist: Arc<dyn PicklistReader> = Arc::new(StaticPicklistSource::from(&source));

    let store = JsonFileFilterStore::new(&list_config.filters_file);
    let list = LocationList::new(Arc::new(store), list_settings).with_notifier(Arc::new(LogNotifier));
    let runtime_settings = list_config.runtime_settings();
    let handle = spawn(list, Arc::new(source), Some(picklist), runtime_settings);
    let mut events = handle.subscribe();
    let quiet = runtime_settings.debounce + runtime_settings.control_delay * 2;

    settle(&mut events, quiet).await;
    for arg in env::args().skip(1) {
        if let Err(err) = apply_argument(&handle, &arg).await {
            log::error!("Skipping argument `{arg}`: {err}");
        }
    }
    settle(&mut events, quiet).await;

    match handle.snapshot().await {
        Ok(view) => {
            log::info!(
                "Page {} of {}, records {}-{} of {}",
                view.pagination.current_page,
                view.pagination.total_pages,
                view.pagination.start_record,
                view.pagination.end_record,
                view.pagination.total_records
            );
            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("Failed to render the list: {err}"),
            }
        }
        Err(err) => log::error!("Failed to read the list: {err}"),
    }

    if let Err(err) = handle.shutdown().await {
        log::error!("Failed to stop the list: {err}");
    }
}
