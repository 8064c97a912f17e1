//! Extension points and the handlers registered against them.
//!
//! A [`Registry`] is assembled once when the process starts and is only read
//! afterwards. Handlers run in ascending priority; handlers sharing a priority
//! run in the order they were added.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use log::{debug, info};

use crate::{MemoryStore, QueryArgs, ViewRequest, EVENT_POST_TYPE};

pub const DEFAULT_PRIORITY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Fired once after the store has been loaded.
    Init,
    /// Fired by the periodic event update job.
    UpdateEvents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Runs over the query arguments of every calendar table.
    MainQueryArgs,
}

pub struct ActionContext<'a> {
    pub store: &'a MemoryStore,
    pub now: NaiveDateTime,
}

pub type ActionFn = Box<dyn Fn(&ActionContext<'_>) + Send + Sync>;
pub type QueryFilterFn = Box<dyn Fn(QueryArgs, &ViewRequest) -> QueryArgs + Send + Sync>;

struct Handler<F> {
    name: &'static str,
    priority: i32,
    callback: F,
}

fn insert_sorted<F>(handlers: &mut Vec<Handler<F>>, handler: Handler<F>) {
    let at = handlers
        .iter()
        .position(|existing| existing.priority > handler.priority)
        .unwrap_or(handlers.len());

    handlers.insert(at, handler);
}

#[derive(Default)]
pub struct Registry {
    actions: HashMap<Action, Vec<Handler<ActionFn>>>,
    filters: HashMap<Filter, Vec<Handler<QueryFilterFn>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action<F>(&mut self, action: Action, name: &'static str, priority: i32, callback: F)
    where
        F: Fn(&ActionContext<'_>) + Send + Sync + 'static,
    {
        insert_sorted(
            self.actions.entry(action).or_default(),
            Handler {
                name,
                priority,
                callback: Box::new(callback) as ActionFn,
            },
        );
    }

    pub fn add_filter<F>(&mut self, filter: Filter, name: &'static str, priority: i32, callback: F)
    where
        F: Fn(QueryArgs, &ViewRequest) -> QueryArgs + Send + Sync + 'static,
    {
        insert_sorted(
            self.filters.entry(filter).or_default(),
            Handler {
                name,
                priority,
                callback: Box::new(callback) as QueryFilterFn,
            },
        );
    }

    pub fn do_action(&self, action: Action, context: &ActionContext<'_>) {
        for handler in self.actions.get(&action).into_iter().flatten() {
            debug!("Running {action:?} handler `{}`", handler.name);
            (handler.callback)(context);
        }
    }

    #[must_use]
    pub fn apply_filters(&self, filter: Filter, args: QueryArgs, request: &ViewRequest) -> QueryArgs {
        self.filters
            .get(&filter)
            .into_iter()
            .flatten()
            .fold(args, |args, handler| (handler.callback)(args, request))
    }

    /// Names of the handlers for `action` in the order they run.
    #[must_use]
    pub fn action_handlers(&self, action: Action) -> Vec<&'static str> {
        self.actions
            .get(&action)
            .into_iter()
            .flatten()
            .map(|handler| handler.name)
            .collect()
    }

    #[must_use]
    pub fn filter_handlers(&self, filter: Filter) -> Vec<&'static str> {
        self.filters
            .get(&filter)
            .into_iter()
            .flatten()
            .map(|handler| handler.name)
            .collect()
    }
}

/// Registers the calendar's own handlers.
pub fn register_event_hooks(registry: &mut Registry) {
    // Statuses
    registry.add_action(Action::Init, "update_post_statuses", DEFAULT_PRIORITY, update_post_statuses);
    registry.add_action(
        Action::UpdateEvents,
        "update_post_statuses",
        DEFAULT_PRIORITY,
        update_post_statuses,
    );

    // Dropdown filters and sortable columns
    registry.add_filter(
        Filter::MainQueryArgs,
        "maybe_filter_by_fields",
        DEFAULT_PRIORITY,
        maybe_filter_by_fields,
    );
    registry.add_filter(
        Filter::MainQueryArgs,
        "maybe_sort_by_fields",
        DEFAULT_PRIORITY,
        maybe_sort_by_fields,
    );
}

fn update_post_statuses(context: &ActionContext<'_>) {
    let updated = context.store.update_statuses(context.now);

    if updated > 0 {
        info!("Marked {updated} events as passed");
    }
}

fn is_event_query(args: &QueryArgs) -> bool {
    args.post_type.as_deref().map_or(true, |post_type| post_type == EVENT_POST_TYPE)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn maybe_filter_by_fields(mut args: QueryArgs, request: &ViewRequest) -> QueryArgs {
    if !is_event_query(&args) {
        return args;
    }

    if let Some(category) = non_empty(request.category.as_ref()) {
        args.category = Some(category);
    }

    if let Some(event_type) = non_empty(request.event_type.as_ref()) {
        args.event_type = Some(event_type);
    }

    args
}

fn maybe_sort_by_fields(mut args: QueryArgs, request: &ViewRequest) -> QueryArgs {
    if !is_event_query(&args) {
        return args;
    }

    if let Some(orderby) = request.orderby.as_deref().and_then(|value| value.parse().ok()) {
        args.orderby = Some(orderby);
    }

    if let Some(order) = request.order.as_deref().and_then(|value| value.parse().ok()) {
        args.order = order;
    }

    args
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Event, EventStatus, Order, OrderBy};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn runs_actions_by_priority_then_registration() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();

        for (name, priority) in [("late", 20), ("first", 10), ("second", 10), ("early", 5)] {
            let calls = Arc::clone(&calls);
            registry.add_action(Action::Init, name, priority, move |_| {
                calls.lock().unwrap().push(name);
            });
        }

        let store = MemoryStore::default();
        registry.do_action(Action::Init, &ActionContext { store: &store, now: noon() });

        assert_eq!(*calls.lock().unwrap(), vec!["early", "first", "second", "late"]);
        assert_eq!(registry.action_handlers(Action::Init), vec!["early", "first", "second", "late"]);
    }

    #[test]
    fn action_without_handlers_is_a_no_op() {
        let registry = Registry::new();
        let store = MemoryStore::default();

        registry.do_action(Action::UpdateEvents, &ActionContext { store: &store, now: noon() });
    }

    #[test]
    fn event_hooks_manifest() {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        assert_eq!(registry.action_handlers(Action::Init), vec!["update_post_statuses"]);
        assert_eq!(registry.action_handlers(Action::UpdateEvents), vec!["update_post_statuses"]);
        assert_eq!(
            registry.filter_handlers(Filter::MainQueryArgs),
            vec!["maybe_filter_by_fields", "maybe_sort_by_fields"]
        );
    }

    #[test]
    fn update_events_marks_passed() {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        let earlier = noon() - chrono::Duration::hours(2);
        let store = MemoryStore::new(vec![Event::new(1, "Earlier").starting(earlier)]);
        registry.do_action(Action::UpdateEvents, &ActionContext { store: &store, now: noon() });

        assert_eq!(store.get(1).unwrap().status, EventStatus::Passed);
    }

    #[test]
    fn query_filters_apply_request_fields() {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        let request = ViewRequest {
            category: Some("team".into()),
            event_type: Some("  ".into()),
            orderby: Some("title".into()),
            order: Some("desc".into()),
        };
        let args = registry.apply_filters(
            Filter::MainQueryArgs,
            QueryArgs {
                post_type: Some(EVENT_POST_TYPE.into()),
                ..QueryArgs::default()
            },
            &request,
        );

        assert_eq!(args.category.as_deref(), Some("team"));
        assert_eq!(args.event_type, None);
        assert_eq!(args.orderby, Some(OrderBy::Title));
        assert_eq!(args.order, Order::Desc);
    }

    #[test]
    fn query_filters_leave_other_post_types_alone() {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        let args = QueryArgs {
            post_type: Some("page".into()),
            ..QueryArgs::default()
        };
        let request = ViewRequest {
            category: Some("team".into()),
            ..ViewRequest::default()
        };

        assert_eq!(
            registry.apply_filters(Filter::MainQueryArgs, args.clone(), &request),
            args
        );
    }
}
