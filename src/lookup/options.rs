use std::{collections::HashMap, sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    api::ApiError,
    domain::OptionItem,
    form::{OptionSet, OptionSource},
    i18n::Locale,
};

use super::{
    clock::Clock,
    debounce::{Debouncer, RequestId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(RequestId),
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
struct OptionSlot {
    options: OptionSet,
    state: LoadState,
}

/// Option lists for one dialog session. Requests are coalesced through the
/// session's own debouncer; a reload keeps the previous list visible until
/// its answer arrives.
#[derive(Debug, Clone)]
pub struct OptionLookup {
    debouncer: Debouncer,
    wanted: Vec<OptionSource>,
    slots: HashMap<OptionSource, OptionSlot>,
}

impl OptionLookup {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            debouncer: Debouncer::new(window, clock),
            wanted: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Schedules a (re)load of the remote sources among `sources`.
    pub fn request(&mut self, sources: impl IntoIterator<Item = OptionSource>) {
        let mut any = false;
        for source in sources.into_iter().filter(|source| source.is_remote()) {
            if !self.wanted.contains(&source) {
                self.wanted.push(source);
            }
            any = true;
        }
        if any {
            self.debouncer.trigger();
        }
    }

    /// Sources to fetch now, all tagged with the same request id.
    pub fn poll(&mut self) -> Option<(RequestId, Vec<OptionSource>)> {
        if self.wanted.is_empty() {
            return None;
        }
        let id = self.debouncer.poll()?;
        let sources = std::mem::take(&mut self.wanted);
        for source in &sources {
            let slot = self.slots.entry(*source).or_insert_with(|| OptionSlot {
                options: OptionSet::default(),
                state: LoadState::Idle,
            });
            slot.state = LoadState::Loading(id);
        }
        Some((id, sources))
    }

    /// Applies an answer. Returns false when it was superseded by a newer
    /// request and therefore dropped.
    pub fn complete(
        &mut self,
        source: OptionSource,
        id: RequestId,
        result: Result<Vec<OptionItem>, ApiError>,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(&source) else {
            return false;
        };
        if slot.state != LoadState::Loading(id) {
            debug!(?source, %id, "discarding stale option list");
            return false;
        }
        match result {
            Ok(items) => {
                debug!(?source, count = items.len(), "options loaded");
                slot.options = OptionSet::new(items);
                slot.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(?source, error = %err, "option lookup failed");
                slot.options = OptionSet::default();
                slot.state = LoadState::Failed;
            }
        }
        true
    }

    pub fn options(&self, source: OptionSource, locale: Locale) -> OptionSet {
        if let Some(items) = source.static_options(locale) {
            return OptionSet::new(items);
        }
        self.slots
            .get(&source)
            .map(|slot| slot.options.clone())
            .unwrap_or_default()
    }

    pub fn state(&self, source: OptionSource) -> LoadState {
        if !source.is_remote() {
            return LoadState::Loaded;
        }
        self.slots
            .get(&source)
            .map(|slot| slot.state)
            .unwrap_or(LoadState::Idle)
    }

    pub fn is_loading(&self, source: OptionSource) -> bool {
        matches!(self.state(source), LoadState::Loading(_)) || self.wanted.contains(&source)
    }

    pub fn clear(&mut self) {
        self.debouncer.reset();
        self.wanted.clear();
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ManualClock;

    fn lookup() -> (ManualClock, OptionLookup) {
        let clock = ManualClock::new();
        let lookup = OptionLookup::new(Duration::from_millis(100), Arc::new(clock.clone()));
        (clock, lookup)
    }

    #[test]
    fn static_sources_never_hit_the_network() {
        let (clock, mut lookup) = lookup();
        lookup.request([OptionSource::Status, OptionSource::Condition]);
        clock.advance(Duration::from_millis(200));
        assert!(lookup.poll().is_none());
        assert_eq!(lookup.options(OptionSource::Status, Locale::EnUs).len(), 2);
    }

    #[test]
    fn previous_list_stays_visible_while_reloading() {
        let (clock, mut lookup) = lookup();
        lookup.request([OptionSource::AlarmGroups]);
        clock.advance(Duration::from_millis(100));
        let (id, sources) = lookup.poll().unwrap();
        assert_eq!(sources, vec![OptionSource::AlarmGroups]);
        assert!(lookup.complete(OptionSource::AlarmGroups, id, Ok(vec![OptionItem::new(1, "oncall")])));

        lookup.request([OptionSource::AlarmGroups]);
        clock.advance(Duration::from_millis(100));
        let (reload, _) = lookup.poll().unwrap();
        assert!(lookup.is_loading(OptionSource::AlarmGroups));
        assert_eq!(lookup.options(OptionSource::AlarmGroups, Locale::EnUs).len(), 1);

        assert!(!lookup.complete(OptionSource::AlarmGroups, id, Ok(Vec::new())));
        assert!(lookup.complete(
            OptionSource::AlarmGroups,
            reload,
            Err(ApiError::Network("down".into()))
        ));
        assert!(lookup.options(OptionSource::AlarmGroups, Locale::EnUs).is_empty());
        assert_eq!(lookup.state(OptionSource::AlarmGroups), LoadState::Failed);
    }
}
