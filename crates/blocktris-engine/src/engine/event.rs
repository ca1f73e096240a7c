use std::{fmt, sync::mpsc};

use serde::Serialize;

use crate::core::piece::{PieceKind, Position};

use super::game_info::GameInfo;

/// State changes published by a [`Board`](super::Board).
///
/// Events carry either no payload (the falling piece moved or rotated) or a
/// snapshot of the progress tracker; [`BoardEvent::info`] tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum BoardEvent {
    /// The falling piece moved or rotated.
    MoveApplied,
    /// The falling piece was written into the grid.
    PieceFroze {
        kind: PieceKind,
        cells: [Position; 4],
    },
    /// A filled row was removed. Fired once per row, topmost first.
    LineCleared { row: usize, info: GameInfo },
    /// Score, level, next piece or game-over state changed.
    InfoChanged(GameInfo),
}

impl BoardEvent {
    /// Returns the tracker snapshot carried by this event, if any.
    #[must_use]
    pub fn info(&self) -> Option<&GameInfo> {
        match self {
            BoardEvent::LineCleared { info, .. } | BoardEvent::InfoChanged(info) => Some(info),
            BoardEvent::MoveApplied | BoardEvent::PieceFroze { .. } => None,
        }
    }
}

/// Handle returned by [`Board::subscribe`](super::Board::subscribe), used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

enum Sink {
    Callback(Box<dyn FnMut(&BoardEvent)>),
    Channel(mpsc::Sender<BoardEvent>),
}

/// Registered observers, notified synchronously in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    sinks: Vec<(ObserverId, Sink)>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Observers {
    fn insert(&mut self, sink: Sink) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    pub(crate) fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&BoardEvent) + 'static,
    {
        self.insert(Sink::Callback(Box::new(callback)))
    }

    pub(crate) fn subscribe_channel(&mut self) -> mpsc::Receiver<BoardEvent> {
        let (tx, rx) = mpsc::channel();
        self.insert(Sink::Channel(tx));
        rx
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sink_id, _)| *sink_id != id);
        self.sinks.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Delivers `event` to every observer. Channels whose receiver is gone
    /// are dropped.
    pub(crate) fn publish(&mut self, event: &BoardEvent) {
        self.sinks.retain_mut(|(_, sink)| match sink {
            Sink::Callback(callback) => {
                callback(event);
                true
            }
            Sink::Channel(tx) => tx.send(event.clone()).is_ok(),
        });
    }
}
