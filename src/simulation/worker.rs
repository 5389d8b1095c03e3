//! Background computation behind a message-passing boundary.
//!
//! Requests and responses are moved across an `mpsc` channel; nothing is
//! shared but the immutable engine. The worker drains its queue before each
//! run and computes only the newest request, so a burst of edits costs one
//! pass. Consumers compare generations to decide whether a response is
//! still current.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::WorkerClosed;

use super::engine::{SimulationEngine, SimulationRequest, SimulationResponse};

/// Monotonic input-generation counter.
///
/// Bump it on every input change; a response is current when its
/// generation equals the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the new generation.
    pub fn bump(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }
}

/// Commands accepted by the worker thread.
enum WorkerMessage {
    Compute(Box<SimulationRequest>),
    Shutdown,
}

/// Owns the computation thread.
pub struct SimulationWorker {
    sender: Sender<WorkerMessage>,
    responses: Receiver<SimulationResponse>,
    latest: Option<SimulationResponse>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationWorker {
    /// Spawn the worker thread.
    pub fn spawn(engine: Arc<SimulationEngine>) -> Self {
        let (tx, rx) = mpsc::channel::<WorkerMessage>();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            log::debug!("Simulation worker started");
            while let Ok(message) = rx.recv() {
                // Newest pending message wins
                let mut message = message;
                while let Ok(next) = rx.try_recv() {
                    if let WorkerMessage::Compute(ref superseded) = message {
                        log::debug!("Generation {} superseded before compute", superseded.generation);
                    }
                    message = next;
                    if matches!(message, WorkerMessage::Shutdown) {
                        break;
                    }
                }

                match message {
                    WorkerMessage::Compute(request) => {
                        let response = engine.compute(&request);
                        if response_tx.send(response).is_err() {
                            break;
                        }
                    }
                    WorkerMessage::Shutdown => break,
                }
            }
            log::debug!("Simulation worker stopped");
        });

        Self {
            sender: tx,
            responses: response_rx,
            latest: None,
            handle: Some(handle),
        }
    }

    /// Queue a request. Any older queued request will be dropped.
    pub fn submit(&self, request: SimulationRequest) -> Result<(), WorkerClosed> {
        self.sender
            .send(WorkerMessage::Compute(Box::new(request)))
            .map_err(|_| WorkerClosed)
    }

    /// Newest response received so far, without blocking.
    pub fn latest(&mut self) -> Option<&SimulationResponse> {
        while let Ok(response) = self.responses.try_recv() {
            self.accept(response);
        }
        self.latest.as_ref()
    }

    /// Block until a response for `generation` (or newer) arrives.
    pub fn wait_for(&mut self, generation: u64, timeout: Duration) -> Option<&SimulationResponse> {
        let deadline = Instant::now() + timeout;
        while self.latest.as_ref().map_or(true, |r| r.generation < generation) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(response) => self.accept(response),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
        self.latest.as_ref()
    }

    fn accept(&mut self, response: SimulationResponse) {
        let newer = self.latest.as_ref().map_or(true, |r| response.generation >= r.generation);
        if newer {
            self.latest = Some(response);
        } else {
            log::debug!("Dropping stale response for generation {}", response.generation);
        }
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationGrid;

    #[test]
    fn test_generation_counter() {
        let mut counter = GenerationCounter::new();
        assert_eq!(counter.current(), 0);
        let g = counter.bump();
        assert!(counter.is_current(g));
        counter.bump();
        assert!(!counter.is_current(g));
    }

    #[test]
    fn test_worker_returns_newest_generation() {
        let engine = Arc::new(SimulationEngine::builtin().unwrap());
        let mut worker = SimulationWorker::spawn(engine);
        let mut counter = GenerationCounter::new();

        for _ in 0..3 {
            let generation = counter.bump();
            worker
                .submit(SimulationRequest::new(SimulationGrid::default(), Vec::new()).with_generation(generation))
                .unwrap();
        }

        let response = worker
            .wait_for(counter.current(), Duration::from_secs(30))
            .expect("worker response");
        assert_eq!(response.generation, 3);
        assert!(counter.is_current(response.generation));
        assert_eq!(response.snapshot.len(), 288);
    }
}
