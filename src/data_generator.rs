//! Seeded generator of plausible ingestion batches, standing in for the
//! external event source in tests and benches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::EventBatch;
use crate::model::Timestamp;

/// Produces event batches against a growing pool of known users: mostly
/// registrations while the pool is small, relationship-heavy once it isn't.
#[derive(Debug)]
pub struct EventGenerator {
    rng: StdRng,
    clock: Timestamp,
    names: Vec<String>,
    next_user: usize,
}

impl EventGenerator {
    /// A generator with a deterministic seed; identical seeds replay
    /// identical event streams.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: 1_700_000_000_000,
            names: Vec::new(),
            next_user: 0,
        }
    }

    /// Generates one batch of `events` events.
    pub fn generate_batch(&mut self, events: usize) -> EventBatch {
        let mut batch = EventBatch::new();
        for _ in 0..events {
            let roll = self.rng.gen_range(0..100u32);
            if self.names.len() < 2 || roll < 30 {
                let name = self.fresh_name();
                let ts = self.tick();
                batch = batch.register(&name, ts);
                self.names.push(name);
            } else if roll < 55 {
                let (referrer, referee) = self.known_pair();
                let ts = self.tick();
                batch = batch.refer(&referrer, &referee, ts);
            } else if roll < 85 {
                let (user1, user2) = self.known_pair();
                let ts = self.tick();
                batch = batch.add_friend(&user1, &user2, ts);
            } else {
                let (user1, user2) = self.known_pair();
                batch = batch.unfriend(&user1, &user2);
            }
        }
        batch
    }

    /// Users the generator has registered so far.
    pub fn user_pool(&self) -> &[String] {
        &self.names
    }

    fn tick(&mut self) -> Timestamp {
        self.clock += self.rng.gen_range(50..5_000);
        self.clock
    }

    fn fresh_name(&mut self) -> String {
        self.next_user += 1;
        format!("user{:05}", self.next_user)
    }

    fn known_pair(&mut self) -> (String, String) {
        let first = self.rng.gen_range(0..self.names.len());
        let mut second = self.rng.gen_range(0..self.names.len());
        if second == first {
            second = (second + 1) % self.names.len();
        }
        (self.names[first].clone(), self.names[second].clone())
    }
}
