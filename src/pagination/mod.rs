//! # Load-more pagination
//!
//! Category pages show a first batch of cards and a "more" button that
//! appends the next batch asynchronously. The driver keeps clicking that
//! button until it disappears, is disabled, or the browser reports it is no
//! longer interactable.
//!
//! ## States
//!
//! - **Expanding**: the control is visible and enabled; scroll, settle, click
//! - **Exhausted**: the control is hidden, disabled, or not interactable
//! - **Failed**: any other interaction error, or the click limit was hit
//!
//! A page without the control is already complete and yields zero clicks.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::traits::{PageControl, RenderSession};

/// Why the driver stopped clicking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page never had a load-more control
    ControlAbsent,
    ControlHidden,
    ControlDisabled,
    /// The click was rejected as not interactable
    NotInteractable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOutcome {
    pub clicks: usize,
    pub stop: StopReason,
}

#[derive(Debug)]
pub enum PaginationFailure {
    /// Locating or interacting with the control failed unexpectedly
    Interaction { clicks: usize, source: SessionError },
    /// The control was still active after `max_clicks` clicks
    Limit { max_clicks: usize },
}

enum State {
    Expanding { clicks: usize },
    Exhausted(PaginationOutcome),
    Failed(PaginationFailure),
}

#[derive(Debug, Clone)]
pub struct PaginationDriver {
    load_more: String,
    settle_delay: Duration,
    max_clicks: usize,
}

impl PaginationDriver {
    pub fn new(load_more: impl Into<String>, settle_delay: Duration, max_clicks: usize) -> Self {
        Self {
            load_more: load_more.into(),
            settle_delay,
            max_clicks,
        }
    }

    /// Click the load-more control until the page stops growing
    ///
    /// The session's document reflects the fully expanded list on success.
    pub async fn expand<S: RenderSession>(
        &self,
        session: &S,
    ) -> Result<PaginationOutcome, PaginationFailure> {
        let control = match session.find_one(&self.load_more).await {
            Ok(Some(control)) => control,
            Ok(None) => {
                debug!("No load-more control on page");
                return Ok(PaginationOutcome {
                    clicks: 0,
                    stop: StopReason::ControlAbsent,
                });
            }
            Err(source) => {
                return Err(PaginationFailure::Interaction { clicks: 0, source });
            }
        };

        let mut state = State::Expanding { clicks: 0 };
        loop {
            state = match state {
                State::Expanding { clicks } => self.step(&control, clicks).await,
                State::Exhausted(outcome) => {
                    info!(
                        "Pagination exhausted after {} clicks ({:?})",
                        outcome.clicks, outcome.stop
                    );
                    return Ok(outcome);
                }
                State::Failed(failure) => return Err(failure),
            };
        }
    }

    async fn step<C: PageControl>(&self, control: &C, clicks: usize) -> State {
        let exhausted = |stop| State::Exhausted(PaginationOutcome { clicks, stop });
        let failed = |source| State::Failed(PaginationFailure::Interaction { clicks, source });

        match control.is_displayed().await {
            Ok(true) => {}
            Ok(false) => return exhausted(StopReason::ControlHidden),
            Err(e) => return failed(e),
        }
        match control.is_enabled().await {
            Ok(true) => {}
            Ok(false) => return exhausted(StopReason::ControlDisabled),
            Err(e) => return failed(e),
        }

        if clicks >= self.max_clicks {
            warn!("Load-more control still active after {} clicks", clicks);
            return State::Failed(PaginationFailure::Limit {
                max_clicks: self.max_clicks,
            });
        }

        if let Err(e) = control.scroll_into_view().await {
            return failed(e);
        }
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        match control.click().await {
            Ok(()) => {
                debug!("Load-more click {}", clicks + 1);
                State::Expanding { clicks: clicks + 1 }
            }
            Err(SessionError::NotInteractable(_)) => exhausted(StopReason::NotInteractable),
            Err(e) => failed(e),
        }
    }
}

/// Dismiss the cookie consent banner if the page shows one
///
/// Never fails: a missing banner or a rejected click is only logged.
pub async fn dismiss_cookie_banner<S: RenderSession>(session: &S, selector: &str) {
    match session.find_one(selector).await {
        Ok(Some(button)) => {
            if let Err(e) = button.click().await {
                warn!("Failed to dismiss cookie banner: {}", e);
            } else {
                debug!("Cookie banner dismissed");
            }
        }
        Ok(None) => debug!("No cookie banner present"),
        Err(e) => warn!("Failed to look up cookie banner: {}", e),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory render session used by pagination and harvester tests

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::SessionError;
    use crate::traits::{PageControl, RenderSession};

    /// How the fake load-more control behaves once it has been clicked `after` times
    #[derive(Debug, Clone, Copy)]
    pub enum Exhaustion {
        Hide { after: usize },
        Disable { after: usize },
        RejectClick { after: usize },
        FailClick { after: usize },
        Never,
    }

    #[derive(Debug, Clone)]
    pub struct FakeControl {
        pub clicks: Arc<AtomicUsize>,
        pub scrolls: Arc<AtomicUsize>,
        pub exhaustion: Exhaustion,
    }

    impl FakeControl {
        pub fn new(exhaustion: Exhaustion) -> Self {
            Self {
                clicks: Arc::new(AtomicUsize::new(0)),
                scrolls: Arc::new(AtomicUsize::new(0)),
                exhaustion,
            }
        }

        pub fn clicks(&self) -> usize {
            self.clicks.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageControl for FakeControl {
        async fn is_displayed(&self) -> Result<bool, SessionError> {
            Ok(!matches!(self.exhaustion, Exhaustion::Hide { after } if self.clicks() >= after))
        }

        async fn is_enabled(&self) -> Result<bool, SessionError> {
            Ok(!matches!(self.exhaustion, Exhaustion::Disable { after } if self.clicks() >= after))
        }

        async fn scroll_into_view(&self) -> Result<(), SessionError> {
            self.scrolls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn click(&self) -> Result<(), SessionError> {
            match self.exhaustion {
                Exhaustion::RejectClick { after } if self.clicks() >= after => {
                    Err(SessionError::NotInteractable("button hidden".to_string()))
                }
                Exhaustion::FailClick { after } if self.clicks() >= after => {
                    Err(SessionError::Other("stale element".to_string()))
                }
                _ => {
                    self.clicks.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct FakeSession {
        pub load_more: Option<FakeControl>,
        pub cookie: Option<FakeControl>,
        pub source: String,
        pub visited: Arc<Mutex<Vec<String>>>,
        pub quit: Arc<AtomicBool>,
        pub fail_source: bool,
    }

    #[async_trait]
    impl RenderSession for FakeSession {
        type Control = FakeControl;

        async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
            self.visited.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn find_one(&self, selector: &str) -> Result<Option<FakeControl>, SessionError> {
            Ok(match selector {
                ".ecomerce-items-scroll-more" => self.load_more.clone(),
                ".acceptCookies" => self.cookie.clone(),
                _ => None,
            })
        }

        async fn page_source(&self) -> Result<String, SessionError> {
            if self.fail_source {
                return Err(SessionError::Other("window closed".to_string()));
            }
            Ok(self.source.clone())
        }

        async fn quit(self) -> Result<(), SessionError> {
            self.quit.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
