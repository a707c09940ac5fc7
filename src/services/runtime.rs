//! Runs a [`LocationList`] on a tokio task.
//!
//! The driver owns the list and every timer. Callers talk to it through a
//! cloneable [`LocationListHandle`]; free-text edits are debounced, fetches
//! run concurrently in a [`JoinSet`] and their results are applied back to the
//! list in completion order, where stale ones are discarded by token.
//! Shutting down, or dropping every handle, cancels pending timers and aborts
//! in-flight fetches.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};

use crate::domain::filter::FilterUpdate;
use crate::domain::picklist::PicklistOption;
use crate::domain::sort::SortSpec;
use crate::dto::list::{ListEvent, ListView, PageChanged};
use crate::forms::filters::{FilterForm, FilterInput};
use crate::pagination::PageAction;
use crate::repository::{LocationReader, PicklistReader};
use crate::services::list::{FetchRequest, FetchResponse, LocationList, ResponseOutcome};
use crate::services::picklist::load_vaccine_type_options;
use crate::services::schedule::Debouncer;
use crate::services::{ServiceError, ServiceResult};

const COMMAND_CAPACITY: usize = 32;

/// Timer settings of the driver.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeSettings {
    /// Quiet period before a free-text edit is committed.
    pub debounce: Duration,
    /// Delay between a page change and the control status refresh.
    pub control_delay: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            control_delay: Duration::from_millis(50),
        }
    }
}

enum Command {
    KeyUp(FilterUpdate),
    Change(Vec<FilterUpdate>),
    Navigate(PageAction),
    SortBy(SortSpec),
    SetRecordsPerPage(String, oneshot::Sender<ServiceResult<PageChanged>>),
    Clear,
    Refresh,
    Snapshot(oneshot::Sender<ListView>),
    Shutdown(oneshot::Sender<()>),
}

enum TaskOutput {
    Fetch(FetchResponse),
    Picklist(Vec<PicklistOption>),
}

/// Cloneable front of a running location list.
#[derive(Clone)]
pub struct LocationListHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<ListEvent>,
}

impl LocationListHandle {
    async fn send(&self, command: Command) -> ServiceResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ServiceError::Shutdown)
    }

    /// Keystroke in a filter input. Name and address edits are debounced;
    /// every other field is committed right away.
    pub async fn key_up(&self, input: FilterInput) -> ServiceResult<()> {
        let update = FilterUpdate::try_from(input)?;
        if update.field().is_free_text() {
            self.send(Command::KeyUp(update)).await
        } else {
            self.change(update).await
        }
    }

    /// Committed value of a picker, date input or toggle.
    pub async fn change(&self, update: FilterUpdate) -> ServiceResult<()> {
        self.send(Command::Change(vec![update])).await
    }

    pub async fn input(&self, input: FilterInput) -> ServiceResult<()> {
        self.change(FilterUpdate::try_from(input)?).await
    }

    /// Applies a whole filter form as one change.
    pub async fn submit(&self, form: FilterForm) -> ServiceResult<()> {
        let updates = form.into_updates()?;
        self.send(Command::Change(updates)).await
    }

    pub async fn navigate(&self, action: PageAction) -> ServiceResult<()> {
        self.send(Command::Navigate(action)).await
    }

    pub async fn sort_by(&self, spec: SortSpec) -> ServiceResult<()> {
        self.send(Command::SortBy(spec)).await
    }

    pub async fn set_records_per_page(&self, raw: impl Into<String>) -> ServiceResult<PageChanged> {
        let (reply, response) = oneshot::channel();
        self.send(Command::SetRecordsPerPage(raw.into(), reply))
            .await?;
        response.await.map_err(|_| ServiceError::Shutdown)?
    }

    pub async fn clear(&self) -> ServiceResult<()> {
        self.send(Command::Clear).await
    }

    /// Fetches the current criteria again.
    pub async fn refresh(&self) -> ServiceResult<()> {
        self.send(Command::Refresh).await
    }

    pub async fn snapshot(&self) -> ServiceResult<ListView> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        response.await.map_err(|_| ServiceError::Shutdown)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    /// Stops the driver and waits until its timers and fetches are gone.
    pub async fn shutdown(&self) -> ServiceResult<()> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Shutdown(reply)).await?;
        response.await.map_err(|_| ServiceError::Shutdown)
    }
}

/// Starts the driver for `list`. The initial fetch for the restored criteria
/// and the vaccine type options are requested immediately; an inverted
/// restored date range withholds the fetch.
pub fn spawn(
    list: LocationList,
    reader: Arc<dyn LocationReader>,
    picklist: Option<Arc<dyn PicklistReader>>,
    settings: RuntimeSettings,
) -> LocationListHandle {
    let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
    let handle = LocationListHandle {
        commands,
        events: list.event_sender(),
    };

    let driver = Driver {
        list,
        reader,
        commands: receiver,
        text: Debouncer::new(settings.debounce),
        controls: Debouncer::new(settings.control_delay),
        tasks: JoinSet::new(),
    };
    tokio::spawn(driver.run(picklist));

    handle
}

struct Driver {
    list: LocationList,
    reader: Arc<dyn LocationReader>,
    commands: mpsc::Receiver<Command>,
    text: Debouncer<Vec<FilterUpdate>>,
    controls: Debouncer<()>,
    tasks: JoinSet<TaskOutput>,
}

impl Driver {
    async fn run(mut self, picklist: Option<Arc<dyn PicklistReader>>) {
        if let Some(picklist) = picklist {
            self.tasks.spawn(async move {
                TaskOutput::Picklist(load_vaccine_type_options(picklist.as_ref()).await)
            });
        }
        let initial = self.list.fetch_current();
        self.maybe_fetch(initial);

        let acknowledge = loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown(reply)) => break Some(reply),
                    Some(command) => self.handle(command),
                    None => break None,
                },
                updates = self.text.settled() => self.commit_text(updates),
                () = self.controls.settled() => {
                    self.list.publish_controls();
                }
                Some(joined) = self.tasks.join_next() => self.finish(joined),
            }
        };

        self.text.cancel();
        self.controls.cancel();
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        log::debug!("Location list driver stopped");

        if let Some(reply) = acknowledge {
            let _ = reply.send(());
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::KeyUp(update) => self.debounce_text(update),
            Command::Change(updates) => {
                let request = self.list.update_filters(updates);
                self.maybe_fetch(request);
            }
            Command::Navigate(action) => {
                self.list.navigate(action);
                self.refresh_controls();
            }
            Command::SortBy(spec) => {
                self.list.sort_by(spec);
                self.refresh_controls();
            }
            Command::SetRecordsPerPage(raw, reply) => {
                let result = self.list.set_records_per_page(&raw);
                if result.is_ok() {
                    self.refresh_controls();
                }
                let _ = reply.send(result);
            }
            Command::Clear => {
                // Edits still waiting for the debounce belong to the old filters.
                self.text.cancel();
                let request = self.list.clear_filters();
                self.maybe_fetch(request);
            }
            Command::Refresh => {
                let request = self.list.fetch_current();
                self.maybe_fetch(request);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.list.view());
            }
            Command::Shutdown(_) => {}
        }
    }

    /// Merges `update` into the pending edits, one per field, and restarts
    /// the quiet period.
    fn debounce_text(&mut self, update: FilterUpdate) {
        let mut pending = self.text.cancel().unwrap_or_default();
        pending.retain(|queued| queued.field() != update.field());
        pending.push(update);
        self.text.schedule(pending);
    }

    fn commit_text(&mut self, updates: Vec<FilterUpdate>) {
        let request = self.list.update_filters(updates);
        self.maybe_fetch(request);
    }

    fn maybe_fetch(&mut self, request: Option<FetchRequest>) {
        if let Some(request) = request {
            self.start_fetch(request);
        }
    }

    fn start_fetch(&mut self, request: FetchRequest) {
        let reader = Arc::clone(&self.reader);
        self.tasks
            .spawn(async move { TaskOutput::Fetch(request.run(reader).await) });
    }

    fn refresh_controls(&mut self) {
        self.controls.schedule(());
    }

    fn finish(&mut self, joined: Result<TaskOutput, JoinError>) {
        match joined {
            Ok(TaskOutput::Fetch(response)) => {
                if self.list.apply_response(response) != ResponseOutcome::Discarded {
                    self.refresh_controls();
                }
            }
            Ok(TaskOutput::Picklist(options)) => self.list.set_vaccine_type_options(options),
            Err(err) if err.is_cancelled() => {}
            Err(err) => log::error!("Location list task failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::filter::FilterCriteria;
    use crate::domain::location::{Location, LocationField};
    use crate::domain::types::LocationId;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::{MemoryFilterStore, StaticPicklistSource};
    use crate::services::filters::DEFAULT_STORAGE_KEY;
    use crate::services::list::ListSettings;

    /// Answers every request with 20 records and remembers it. A request
    /// whose name is "slow" takes a second and answers 40.
    #[derive(Default)]
    struct RecordingReader {
        requests: Mutex<Vec<FilterCriteria>>,
    }

    impl RecordingReader {
        fn requests(&self) -> Vec<FilterCriteria> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LocationReader for RecordingReader {
        async fn fetch_locations(&self, criteria: &FilterCriteria) -> RepositoryResult<Vec<Location>> {
            self.requests.lock().unwrap().push(criteria.clone());
            let count = if criteria.name == "slow" {
                tokio::time::sleep(Duration::from_secs(1)).await;
                40
            } else {
                20
            };
            Ok((0..count)
                .map(|i| {
                    Location::new(
                        LocationId::new(format!("loc-{i:02}")).unwrap(),
                        format!("{} {i:02}", criteria.name),
                    )
                })
                .collect())
        }
    }

    fn start(reader: Arc<RecordingReader>) -> LocationListHandle {
        let list = LocationList::new(Arc::new(MemoryFilterStore::new()), ListSettings::default());
        spawn(list, reader, None, RuntimeSettings::default())
    }

    async fn idle() {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn initial_fetch_runs_on_start() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        idle().await;

        let view = handle.snapshot().await.unwrap();
        assert_eq!(reader.requests().len(), 1);
        assert_eq!(view.records_to_display.len(), 15);
        assert_eq!(view.pagination.total_pages, 2);
        assert!(!view.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn restored_inverted_range_never_fetches() {
        let reader = Arc::new(RecordingReader::default());
        let store = MemoryFilterStore::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"{"startDate":"2024-05-10","closingDate":"2024-05-01"}"#,
        );
        let list = LocationList::new(Arc::new(store), ListSettings::default());
        let handle = spawn(list, reader.clone(), None, RuntimeSettings::default());
        idle().await;
        handle.refresh().await.unwrap();
        idle().await;

        assert!(reader.requests().is_empty());
        assert!(!handle.snapshot().await.unwrap().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_fetch_once() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        for value in ["a", "ab", "abc"] {
            handle.key_up(FilterInput::new("name", value)).await.unwrap();
        }
        idle().await;

        let requests = reader.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].name, "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_edits_on_two_fields_are_merged() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        handle.key_up(FilterInput::new("name", "north")).await.unwrap();
        handle.key_up(FilterInput::new("address", "main")).await.unwrap();
        idle().await;

        let requests = reader.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].name, "north");
        assert_eq!(requests[1].address, "main");
    }

    #[tokio::test(start_paused = true)]
    async fn key_up_on_a_picker_is_immediate() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        handle
            .key_up(FilterInput::new("vaccineType", "Pfizer"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(reader.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_never_overwrites_newer_one() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        handle.change(FilterUpdate::Name("slow".into())).await.unwrap();
        handle.change(FilterUpdate::Name("fast".into())).await.unwrap();
        idle().await;

        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.pagination.total_records, 20);
        assert_eq!(view.records_to_display[0].name, "fast 00");
    }

    #[tokio::test(start_paused = true)]
    async fn controls_follow_page_changes() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader);
        let mut events = handle.subscribe();
        idle().await;
        handle.navigate(PageAction::Next).await.unwrap();
        idle().await;

        let mut controls = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ListEvent::ControlsChanged(status) = event {
                controls.push(status);
            }
        }
        assert_eq!(controls.len(), 2);
        assert!(controls[0].previous && !controls[0].next);
        assert!(!controls[1].previous && controls[1].next);
    }

    #[tokio::test(start_paused = true)]
    async fn records_per_page_is_validated() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader);
        idle().await;

        assert!(matches!(
            handle.set_records_per_page("0").await,
            Err(ServiceError::InvalidPageSize(_))
        ));
        let page = handle.set_records_per_page("5").await.unwrap();
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn sort_applies_to_cached_records() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader);
        idle().await;
        handle
            .sort_by(SortSpec::desc(LocationField::Name))
            .await
            .unwrap();

        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.records_to_display[0].name, " 19");
        assert_eq!(view.sort, Some(SortSpec::desc(LocationField::Name)));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_debounce() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        handle.key_up(FilterInput::new("name", "late")).await.unwrap();
        handle.shutdown().await.unwrap();
        idle().await;

        assert!(reader.requests().iter().all(|c| c.name != "late"));
        assert!(matches!(
            handle.refresh().await,
            Err(ServiceError::Shutdown)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_control_refresh() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        idle().await;
        let mut events = handle.subscribe();
        handle.navigate(PageAction::Next).await.unwrap();
        handle.shutdown().await.unwrap();
        idle().await;

        let mut page_changed = false;
        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, ListEvent::ControlsChanged(_)));
            page_changed |= matches!(event, ListEvent::PageChanged(_));
        }
        assert!(page_changed);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_pending_edits() {
        let reader = Arc::new(RecordingReader::default());
        let handle = start(reader.clone());
        idle().await;
        handle.change(FilterUpdate::Archived(true)).await.unwrap();
        handle.key_up(FilterInput::new("name", "typed")).await.unwrap();
        handle.clear().await.unwrap();
        idle().await;

        let requests = reader.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[2].is_all_blank());
        assert!(handle.snapshot().await.unwrap().criteria.is_all_blank());
    }

    #[tokio::test(start_paused = true)]
    async fn vaccine_type_options_are_loaded() {
        let reader = Arc::new(RecordingReader::default());
        let list = LocationList::new(Arc::new(MemoryFilterStore::new()), ListSettings::default());
        let picklist: Arc<dyn PicklistReader> = Arc::new(StaticPicklistSource::new(vec![
            PicklistOption::new("Pfizer", "Pfizer"),
        ]));
        let handle = spawn(list, reader, Some(picklist), RuntimeSettings::default());
        idle().await;

        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.vaccine_type_options.len(), 2);
        assert_eq!(view.vaccine_type_options[0], PicklistOption::all());
    }
}
