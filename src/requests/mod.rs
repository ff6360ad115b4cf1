//! Pick and modal requests.
//!
//! When a card needs a decision from a player mid-resolution it queues a
//! request and returns. Requests are answered strictly first-in first-out:
//! only the head is active, and while it is open the targeted player can
//! only answer it and the other player can only wait.
//!
//! Answers that are not [`ActionResult::Success`] leave the request open
//! for another try. `timeout_request` resolves the head through its
//! timeout callback and is safe to call any number of times.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::components::SlotComponent;
use crate::core::{EntityId, GameState};
use crate::query::Query;

/// Outcome of an answer (or any other turn action).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionResult {
    Success,
    FailureInvalidData,
    FailureCannotComplete,
    FailureWrongPlayer,
    FailureUnmetCondition,
}

impl ActionResult {
    #[must_use]
    pub fn is_success(self) -> bool {
        self == ActionResult::Success
    }
}

/// A player's answer to a modal request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModalResult {
    Confirm { result: bool },
    SelectCards { cards: Vec<EntityId> },
    Choice { index: u32 },
}

/// What a modal request shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModalData {
    Confirm {
        title: String,
        description: String,
    },
    SelectCards {
        title: String,
        cards: Vec<EntityId>,
        min: usize,
        max: usize,
    },
    Choice {
        title: String,
        options: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

pub type PickResultFn = Arc<dyn Fn(&mut GameState, EntityId) -> ActionResult + Send + Sync>;
pub type ModalResultFn = Arc<dyn Fn(&mut GameState, &ModalResult) -> ActionResult + Send + Sync>;
pub type TimeoutFn = Arc<dyn Fn(&mut GameState) + Send + Sync>;

/// Ask a player to pick a slot.
#[derive(Clone)]
pub struct PickRequest {
    pub id: RequestId,
    /// Player entity that must answer.
    pub player: EntityId,
    /// Card or effect that asked.
    pub creator: EntityId,
    pub message: String,
    pub can_pick: Query<SlotComponent>,
    on_result: PickResultFn,
    on_timeout: Option<TimeoutFn>,
}

impl PickRequest {
    pub fn new(
        player: EntityId,
        creator: EntityId,
        message: impl Into<String>,
        can_pick: Query<SlotComponent>,
        on_result: impl Fn(&mut GameState, EntityId) -> ActionResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: RequestId(0),
            player,
            creator,
            message: message.into(),
            can_pick,
            on_result: Arc::new(on_result),
            on_timeout: None,
        }
    }

    #[must_use]
    pub fn on_timeout(mut self, f: impl Fn(&mut GameState) + Send + Sync + 'static) -> Self {
        self.on_timeout = Some(Arc::new(f));
        self
    }
}

/// Ask a player a free-form question.
#[derive(Clone)]
pub struct ModalRequest {
    pub id: RequestId,
    pub player: EntityId,
    pub creator: EntityId,
    pub data: ModalData,
    on_result: ModalResultFn,
    on_timeout: Option<TimeoutFn>,
}

impl ModalRequest {
    pub fn new(
        player: EntityId,
        creator: EntityId,
        data: ModalData,
        on_result: impl Fn(&mut GameState, &ModalResult) -> ActionResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: RequestId(0),
            player,
            creator,
            data,
            on_result: Arc::new(on_result),
            on_timeout: None,
        }
    }

    #[must_use]
    pub fn on_timeout(mut self, f: impl Fn(&mut GameState) + Send + Sync + 'static) -> Self {
        self.on_timeout = Some(Arc::new(f));
        self
    }
}

#[derive(Clone)]
pub enum Request {
    Pick(PickRequest),
    Modal(ModalRequest),
}

impl Request {
    #[must_use]
    pub fn id(&self) -> RequestId {
        match self {
            Request::Pick(r) => r.id,
            Request::Modal(r) => r.id,
        }
    }

    #[must_use]
    pub fn player(&self) -> EntityId {
        match self {
            Request::Pick(r) => r.player,
            Request::Modal(r) => r.player,
        }
    }

    #[must_use]
    pub fn creator(&self) -> EntityId {
        match self {
            Request::Pick(r) => r.creator,
            Request::Modal(r) => r.creator,
        }
    }

    fn timeout_fn(&self) -> Option<TimeoutFn> {
        match self {
            Request::Pick(r) => r.on_timeout.clone(),
            Request::Modal(r) => r.on_timeout.clone(),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Pick(r) => f
                .debug_struct("PickRequest")
                .field("id", &r.id)
                .field("player", &r.player)
                .field("creator", &r.creator)
                .field("message", &r.message)
                .finish_non_exhaustive(),
            Request::Modal(r) => f
                .debug_struct("ModalRequest")
                .field("id", &r.id)
                .field("player", &r.player)
                .field("creator", &r.creator)
                .field("data", &r.data)
                .finish_non_exhaustive(),
        }
    }
}

/// FIFO of open requests.
#[derive(Clone, Debug, Default)]
pub struct RequestQueue {
    queue: VecDeque<Request>,
    next_id: u64,
}

impl RequestQueue {
    fn push(&mut self, mut request: Request) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        match &mut request {
            Request::Pick(r) => r.id = id,
            Request::Modal(r) => r.id = id,
        }
        self.queue.push_back(request);
        id
    }

    /// The active request.
    #[must_use]
    pub fn head(&self) -> Option<&Request> {
        self.queue.front()
    }

    fn remove(&mut self, id: RequestId) -> Option<Request> {
        let index = self.queue.iter().position(|r| r.id() == id)?;
        self.queue.remove(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.queue.iter()
    }

    /// Drop every open request without calling anything.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl GameState {
    /// Queue a pick request. Refused (returns `None`) when no slot can be
    /// picked.
    pub fn add_pick_request(&mut self, request: PickRequest) -> Option<RequestId> {
        if !self.exists(&request.can_pick) {
            debug!(creator = %request.creator, "pick request refused: nothing to pick");
            return None;
        }
        Some(self.requests.push(Request::Pick(request)))
    }

    pub fn add_modal_request(&mut self, request: ModalRequest) -> RequestId {
        self.requests.push(Request::Modal(request))
    }

    #[must_use]
    pub fn active_request(&self) -> Option<&Request> {
        self.requests.head()
    }

    /// Answer the head pick request with a slot.
    pub fn answer_pick_request(&mut self, player: EntityId, slot: EntityId) -> ActionResult {
        let Some(Request::Pick(request)) = self.requests.head().cloned() else {
            return ActionResult::FailureCannotComplete;
        };
        if request.player != player {
            warn!(%player, "pick answered by the wrong player");
            return ActionResult::FailureWrongPlayer;
        }
        let Some(component) = self.components.get::<SlotComponent>(slot) else {
            return ActionResult::FailureInvalidData;
        };
        if !request.can_pick.matches(self, component) {
            return ActionResult::FailureUnmetCondition;
        }

        let result = (request.on_result)(self, slot);
        if result.is_success() {
            self.requests.remove(request.id);
        }
        result
    }

    /// Answer the head modal request.
    pub fn answer_modal_request(&mut self, player: EntityId, answer: &ModalResult) -> ActionResult {
        let Some(Request::Modal(request)) = self.requests.head().cloned() else {
            return ActionResult::FailureCannotComplete;
        };
        if request.player != player {
            warn!(%player, "modal answered by the wrong player");
            return ActionResult::FailureWrongPlayer;
        }

        let result = (request.on_result)(self, answer);
        if result.is_success() {
            self.requests.remove(request.id);
        }
        result
    }

    /// Resolve the head request through its timeout callback.
    ///
    /// No-op unless `id` is the live head, so repeated calls and calls after
    /// the request was answered do nothing.
    pub fn timeout_request(&mut self, id: RequestId) -> bool {
        if self.requests.head().map(Request::id) != Some(id) {
            return false;
        }
        let Some(request) = self.requests.remove(id) else {
            return false;
        };
        debug!(?id, "request timed out");
        if let Some(on_timeout) = request.timeout_fn() {
            on_timeout(self);
        }
        true
    }

    /// Slots the head pick request accepts.
    #[must_use]
    pub fn pickable_slots(&self) -> Vec<EntityId> {
        match self.requests.head() {
            Some(Request::Pick(r)) => self.filter(&r.can_pick).iter().map(|s| s.entity).collect(),
            _ => Vec::new(),
        }
    }
}
