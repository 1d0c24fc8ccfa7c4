//! Counting resource pool with FIFO-fair waiting.
//!
//! One type serves both resources in the computer: the memory pool hands
//! out arbitrary amounts against a fixed capacity, and the CPU pool hands
//! out unit slots (capacity = core count). Waiters queue in strict FIFO
//! order: a head request that does not fit blocks everything behind it,
//! even if a later, smaller request could be satisfied. That models
//! fairness, not throughput.
//!
//! The pool does not log and does not know about the clock. A grant is
//! observable to the caller either synchronously (`Grant::Immediate`) or
//! through the pid list `release` returns, which the engine turns into
//! same-time resumptions.

use std::collections::VecDeque;

use crate::types::Pid;

/// Outcome of an `acquire` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Capacity was available and the queue was empty: the caller holds
    /// the amount and continues without suspending.
    Immediate,
    /// The request joined the FIFO queue; the caller suspends until a
    /// `release` grants it.
    Queued,
}

#[derive(Debug, Clone)]
struct Waiter {
    amount: u32,
    pid: Pid,
}

/// A counting resource with fixed capacity and FIFO-fair waiters.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    capacity: u32,
    available: u32,
    waiters: VecDeque<Waiter>,
}

impl ResourcePool {
    pub fn new(capacity: u32) -> Self {
        debug_assert!(capacity > 0, "pool capacity must be positive");
        Self {
            capacity,
            available: capacity,
            waiters: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    /// Number of queued requests.
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }

    /// Request `amount` units on behalf of `pid`.
    ///
    /// Grants immediately only when the amount fits *and* no earlier
    /// request is still queued; otherwise the request queues behind them.
    /// A request larger than the pool's capacity queues forever, which is
    /// the intended deadlock-by-misconfiguration outcome.
    pub fn acquire(&mut self, amount: u32, pid: Pid) -> Grant {
        debug_assert!(amount > 0, "zero-amount acquire for pid={}", pid.0);
        if self.waiters.is_empty() && amount <= self.available {
            self.available -= amount;
            Grant::Immediate
        } else {
            self.waiters.push_back(Waiter { amount, pid });
            Grant::Queued
        }
    }

    /// Return `amount` units and service the wait queue head-to-tail.
    ///
    /// Returns the pids whose requests were granted, in FIFO order. Each
    /// granted amount is already deducted from `available` when this
    /// returns; the caller only has to resume the listed processes.
    ///
    /// # Panics
    /// Panics if the release would push `available` past `capacity`,
    /// which means a caller returned units it never held.
    pub fn release(&mut self, amount: u32) -> Vec<Pid> {
        self.available += amount;
        assert!(
            self.available <= self.capacity,
            "pool over-released: available {} exceeds capacity {}",
            self.available,
            self.capacity
        );

        let mut granted = Vec::new();
        while let Some(head) = self.waiters.front() {
            if head.amount > self.available {
                break;
            }
            self.available -= head.amount;
            granted.push(head.pid);
            self.waiters.pop_front();
        }
        granted
    }
}
