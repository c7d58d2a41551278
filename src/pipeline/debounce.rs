// src/pipeline/debounce.rs

//! Debounced search input.
//!
//! Keystrokes restart a quiet-period timer; the query is applied once the
//! timer runs out. Enter cancels the timer and applies the query at once.
//! The task ends when every input sender is dropped, and a query still
//! waiting on the timer at that point is discarded.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::pipeline::state::Action;

/// Default quiet period before a typed query is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Events coming from the search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Field content changed
    Changed(String),
    /// Enter pressed with the current field content
    Enter(String),
}

/// Turn search field events into [`Action::Search`] actions.
///
/// Runs until `inputs` is closed or `actions` has no receiver.
pub async fn debounce_search(
    mut inputs: mpsc::Receiver<SearchInput>,
    actions: mpsc::Sender<Action>,
    delay: Duration,
) {
    let mut pending: Option<String> = None;

    loop {
        let armed = pending.is_some();
        let timer = async move {
            if armed {
                tokio::time::sleep(delay).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            input = inputs.recv() => match input {
                Some(SearchInput::Changed(query)) => pending = Some(query),
                Some(SearchInput::Enter(query)) => {
                    pending = None;
                    if actions.send(Action::Search(query)).await.is_err() {
                        break;
                    }
                }
                None => {
                    if let Some(query) = pending.take() {
                        log::debug!("Search input closed, dropping pending query {query:?}");
                    }
                    break;
                }
            },
            () = timer => {
                if let Some(query) = pending.take() {
                    if actions.send(Action::Search(query)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Spawn [`debounce_search`] on the current runtime.
///
/// Returns the input sender and the action receiver.
pub fn spawn_search_debouncer(
    delay: Duration,
) -> (mpsc::Sender<SearchInput>, mpsc::Receiver<Action>) {
    let (input_tx, input_rx) = mpsc::channel(32);
    let (action_tx, action_rx) = mpsc::channel(8);
    tokio::spawn(debounce_search(input_rx, action_tx, delay));
    (input_tx, action_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(q: &str) -> SearchInput {
        SearchInput::Changed(q.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_fires_once() {
        let (input, mut actions) = spawn_search_debouncer(SEARCH_DEBOUNCE);

        for q in ["b", "bo", "boa", "boat"] {
            input.send(changed(q)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let action = actions.recv().await.unwrap();
        assert_eq!(action, Action::Search("boat".into()));
        assert!(actions.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_quiet_period() {
        let (input, mut actions) = spawn_search_debouncer(SEARCH_DEBOUNCE);
        input.send(changed("army")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(actions.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(actions.recv().await, Some(Action::Search("army".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_fires_immediately_and_cancels_timer() {
        let (input, mut actions) = spawn_search_debouncer(SEARCH_DEBOUNCE);
        input.send(changed("nav")).await.unwrap();
        input.send(SearchInput::Enter("navy".into())).await.unwrap();

        assert_eq!(actions.recv().await, Some(Action::Search("navy".into())));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(actions.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_input_discards_pending_query() {
        let (input, mut actions) = spawn_search_debouncer(SEARCH_DEBOUNCE);
        input.send(changed("late")).await.unwrap();
        drop(input);

        assert_eq!(actions.recv().await, None);
    }
}
