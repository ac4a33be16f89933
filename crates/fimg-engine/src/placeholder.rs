//! Placeholder Preload State Machine
//!
//! `Idle → PlaceholderShown → Loading → Loaded` for one image slot.
//!
//! A placeholder-enabled load shows a tiny low-quality image right away and
//! hands a [`PreloadTicket`] for the full image to a [`Preloader`]. Each
//! session owns a single-use completion channel tagged with a session id;
//! starting a new session drops the old receiver, so a late completion from
//! a superseded preload can never reach the slot.

use crate::image::{ImageRequest, ResolvedImage, Resolver};
use crate::ImageError;
use smol::channel::{self, Receiver, Sender, TryRecvError};
use std::fmt;

/// Monotonic per-slot session identifier
pub type SessionId = u64;

/// Slot lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    PlaceholderShown,
    Loading,
    Loaded,
    /// Preload reported failure; placeholder stays visible
    Failed,
}

/// What the preloader reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadOutcome<E> {
    /// Native load event
    Loaded(E),
    Failed(String),
}

/// Single-use completion handle for one preload
pub struct PreloadTicket<E> {
    session: SessionId,
    target: ResolvedImage,
    tx: Sender<(SessionId, PreloadOutcome<E>)>,
}

impl<E> PreloadTicket<E> {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Full-resolution attributes to preload (`src`, `srcset`, `sizes`)
    pub fn target(&self) -> &ResolvedImage {
        &self.target
    }

    pub fn url(&self) -> &str {
        self.target.default_url()
    }

    /// Report a completed load. Returns `false` if the session is gone.
    pub fn loaded(self, event: E) -> bool {
        self.complete(PreloadOutcome::Loaded(event))
    }

    /// Report a failed load. Returns `false` if the session is gone.
    pub fn failed(self, reason: impl Into<String>) -> bool {
        self.complete(PreloadOutcome::Failed(reason.into()))
    }

    fn complete(self, outcome: PreloadOutcome<E>) -> bool {
        self.tx.try_send((self.session, outcome)).is_ok()
    }
}

impl<E> fmt::Debug for PreloadTicket<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreloadTicket")
            .field("session", &self.session)
            .field("url", &self.target.default_url())
            .finish()
    }
}

/// Starts out-of-band image loads
pub trait Preloader<E> {
    /// Begin loading `ticket.target()`; report through the ticket at most once
    fn preload(&mut self, ticket: PreloadTicket<E>);
}

/// Collects tickets for the host to complete later
impl<E> Preloader<E> for Vec<PreloadTicket<E>> {
    fn preload(&mut self, ticket: PreloadTicket<E>) {
        self.push(ticket);
    }
}

/// Completion signal, emitted at most once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSignal<E> {
    Loaded {
        session: SessionId,
        event: E,
        image: ResolvedImage,
    },
    Failed {
        session: SessionId,
        error: ImageError,
    },
}

/// One placeholder-to-final swap
pub struct PlaceholderSession<E> {
    id: SessionId,
    placeholder_url: String,
    target: ResolvedImage,
    loaded: bool,
    rx: Receiver<(SessionId, PreloadOutcome<E>)>,
}

impl<E> PlaceholderSession<E> {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder_url
    }

    pub fn target(&self) -> &ResolvedImage {
        &self.target
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Visible attributes for one logical image
pub struct ImageSlot<E> {
    next_id: SessionId,
    state: SlotState,
    visible: Option<ResolvedImage>,
    request: Option<ImageRequest>,
    session: Option<PlaceholderSession<E>>,
}

impl<E> Default for ImageSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ImageSlot<E> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            state: SlotState::Idle,
            visible: None,
            request: None,
            session: None,
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Current attributes: either the placeholder or the final image, whole
    pub fn visible(&self) -> Option<&ResolvedImage> {
        self.visible.as_ref()
    }

    /// Active placeholder session
    pub fn session(&self) -> Option<&PlaceholderSession<E>> {
        self.session.as_ref()
    }

    /// Resolve `request` into this slot.
    ///
    /// Unchanged inputs keep the current session. Changed inputs abandon any
    /// in-flight session and start over from `Idle`. Without placeholder
    /// mode the final image is shown immediately and no signal is emitted.
    pub fn load<P>(
        &mut self,
        resolver: &Resolver<'_>,
        request: &ImageRequest,
        preloader: &mut P,
    ) -> Result<(), ImageError>
    where
        P: Preloader<E>,
    {
        if self.state != SlotState::Idle && self.request.as_ref() == Some(request) {
            return Ok(());
        }
        self.reset();

        let target = resolver.resolve_image(request)?;
        if request.placeholder.is_none() {
            self.visible = Some(target);
            self.request = Some(request.clone());
            self.state = SlotState::Loaded;
            return Ok(());
        }

        let placeholder = resolver.resolve_placeholder(request)?;
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = channel::bounded(1);
        self.session = Some(PlaceholderSession {
            id,
            placeholder_url: placeholder.default_url().to_string(),
            target: target.clone(),
            loaded: false,
            rx,
        });
        self.visible = Some(placeholder);
        self.request = Some(request.clone());
        self.state = SlotState::PlaceholderShown;

        tracing::info!("Session {} preloading {}", id, target.default_url());
        preloader.preload(PreloadTicket { session: id, target, tx });
        self.state = SlotState::Loading;
        Ok(())
    }

    /// Drop the current session and return to `Idle`
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            if !session.loaded {
                tracing::debug!("Abandoning session {}", session.id);
            }
        }
        self.visible = None;
        self.request = None;
        self.state = SlotState::Idle;
    }

    /// Apply a completion if one has arrived
    pub fn poll(&mut self) -> Option<SlotSignal<E>> {
        if self.state != SlotState::Loading {
            return None;
        }
        let message = match self.session.as_ref()?.rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                tracing::debug!("Preload ticket dropped without completing");
                return None;
            }
        };
        self.settle(message)
    }

    /// Wait for the current session's completion.
    ///
    /// `None` when nothing is loading or the ticket was dropped. There is
    /// no timeout; a stalled preload keeps the placeholder visible.
    pub async fn next_signal(&mut self) -> Option<SlotSignal<E>> {
        if self.state != SlotState::Loading {
            return None;
        }
        let message = self.session.as_ref()?.rx.recv().await.ok()?;
        self.settle(message)
    }

    fn settle(&mut self, (id, outcome): (SessionId, PreloadOutcome<E>)) -> Option<SlotSignal<E>> {
        let session = self.session.as_mut()?;
        if session.id != id || self.state != SlotState::Loading {
            tracing::debug!("Ignoring stale completion for session {}", id);
            return None;
        }

        match outcome {
            PreloadOutcome::Loaded(event) => {
                session.loaded = true;
                let image = session.target.clone();
                self.visible = Some(image.clone());
                self.state = SlotState::Loaded;
                tracing::info!("Session {} loaded", id);
                Some(SlotSignal::Loaded { session: id, event, image })
            }
            PreloadOutcome::Failed(reason) => {
                let url = session.target.default_url().to_string();
                tracing::warn!("Preload failed for {}: {}", url, reason);
                self.state = SlotState::Failed;
                Some(SlotSignal::Failed {
                    session: id,
                    error: ImageError::PreloadFailed { url, reason },
                })
            }
        }
    }
}
