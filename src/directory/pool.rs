// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Provides the connection [`Pool`].

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use super::{
    AttributeMap, Connection, Directory, Dn, Entry, Error, ErrorKind, Filter, Manager, Modification,
};

/// Configuration of a [`Pool`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// The most connections open at once, idle or checked out.
    pub max_size: usize,

    /// How long a connection may live. Older connections are closed
    /// when they are returned rather than reused.
    pub max_lifetime: Duration,

    /// How long [`Pool::get`] waits for a connection when the pool is
    /// exhausted.
    pub checkout_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            max_lifetime: Duration::from_secs(300),
            checkout_timeout: Duration::from_secs(10),
        }
    }
}

/// A bounded pool of directory connections.
///
/// Connections are opened lazily through the pool's [`Manager`] and
/// handed out as [`PooledConnection`] guards. A connection that fails
/// with [`ErrorKind::Unavailable`] or [`ErrorKind::Timeout`] is closed
/// instead of being returned to the pool.
pub struct Pool<M: Manager> {
    manager: M,
    config: PoolConfig,
    state: Mutex<State<M::Connection>>,
    returned: Condvar,
}

struct State<C> {
    idle: Vec<Idle<C>>,
    open: usize,
}

struct Idle<C> {
    connection: C,
    opened: Instant,
}

impl<M: Manager> Pool<M> {
    pub fn new(manager: M, config: PoolConfig) -> Self {
        Self {
            manager,
            config,
            state: Mutex::new(State {
                idle: Vec::new(),
                open: 0,
            }),
            returned: Condvar::new(),
        }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the number of open connections, idle or checked out.
    pub fn open_count(&self) -> usize {
        self.lock().open
    }

    /// Returns the number of idle connections.
    pub fn idle_count(&self) -> usize {
        self.lock().idle.len()
    }

    /// Checks out a connection, reusing an idle one if possible and
    /// otherwise opening a new one. If [`PoolConfig::max_size`]
    /// connections are already checked out, this waits up to
    /// [`PoolConfig::checkout_timeout`] for one to be returned.
    pub fn get(&self) -> Result<PooledConnection<M>, Error> {
        let deadline = Instant::now() + self.config.checkout_timeout;
        let mut state = self.lock();
        loop {
            while let Some(idle) = state.idle.pop() {
                if idle.opened.elapsed() < self.config.max_lifetime {
                    return Ok(PooledConnection {
                        pool: self,
                        connection: Some(idle.connection),
                        opened: idle.opened,
                        broken: false,
                    });
                }
                state.open -= 1;
                debug!("Closing expired directory connection");
            }

            if state.open < self.config.max_size {
                state.open += 1;
                drop(state);
                return match self.manager.connect() {
                    Ok(connection) => {
                        debug!("Opened new directory connection");
                        Ok(PooledConnection {
                            pool: self,
                            connection: Some(connection),
                            opened: Instant::now(),
                            broken: false,
                        })
                    }
                    Err(e) => {
                        self.lock().open -= 1;
                        self.returned.notify_one();
                        Err(e)
                    }
                };
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::new(
                    ErrorKind::Timeout,
                    format!(
                        "no directory connection became available within {:?}",
                        self.config.checkout_timeout
                    ),
                ));
            }
            state = self
                .returned
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    fn check_in(&self, connection: M::Connection, opened: Instant, broken: bool) {
        let mut state = self.lock();
        if broken || opened.elapsed() >= self.config.max_lifetime {
            state.open -= 1;
            debug!("Closing directory connection (broken: {})", broken);
        } else {
            state.idle.push(Idle { connection, opened });
        }
        drop(state);
        self.returned.notify_one();
    }

    fn lock(&self) -> MutexGuard<State<M::Connection>> {
        // The state is consistent between statements, so a panic in
        // another thread cannot leave it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

////////////////////////////////////////////////////////////////////////
// POOLED CONNECTIONS                                                 //
////////////////////////////////////////////////////////////////////////

/// A connection checked out of a [`Pool`]. The connection goes back to
/// the pool when this guard is dropped.
pub struct PooledConnection<'a, M: Manager> {
    pool: &'a Pool<M>,
    connection: Option<M::Connection>,
    opened: Instant,
    broken: bool,
}

impl<M: Manager> PooledConnection<'_, M> {
    /// Marks the connection as unusable, so that it is closed rather
    /// than returned to the pool.
    pub fn discard(&mut self) {
        self.broken = true;
    }

    fn track<T>(
        &mut self,
        op: impl FnOnce(&mut M::Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = match self.connection.as_mut() {
            Some(connection) => connection,
            None => return Err(Error::new(ErrorKind::Other, "connection already returned")),
        };
        let result = op(connection);
        if let Err(ref e) = result {
            if e.kind().is_connection_fatal() {
                self.broken = true;
            }
        }
        result
    }
}

impl<M: Manager> Drop for PooledConnection<'_, M> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.pool.check_in(connection, self.opened, self.broken);
        }
    }
}

impl<M: Manager> Connection for PooledConnection<'_, M> {
    fn search(
        &mut self,
        base: &Dn,
        filter: &Filter,
        attributes: &[&str],
    ) -> Result<Vec<Entry>, Error> {
        self.track(|c| c.search(base, filter, attributes))
    }

    fn get(&mut self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error> {
        self.track(|c| c.get(dn, attributes))
    }

    fn add(
        &mut self,
        dn: &Dn,
        object_classes: &[&str],
        attributes: AttributeMap,
    ) -> Result<(), Error> {
        self.track(|c| c.add(dn, object_classes, attributes))
    }

    fn modify(&mut self, dn: &Dn, changes: &[Modification]) -> Result<(), Error> {
        self.track(|c| c.modify(dn, changes))
    }

    fn delete(&mut self, dn: &Dn) -> Result<(), Error> {
        self.track(|c| c.delete(dn))
    }
}

impl<M: Manager> Directory for Pool<M> {
    fn search(&self, base: &Dn, filter: &Filter, attributes: &[&str]) -> Result<Vec<Entry>, Error> {
        self.get()?.search(base, filter, attributes)
    }

    fn get(&self, dn: &Dn, attributes: &[&str]) -> Result<Option<Entry>, Error> {
        Connection::get(&mut Pool::get(self)?, dn, attributes)
    }

    fn add(
        &self,
        dn: &Dn,
        object_classes: &[&str],
        attributes: AttributeMap,
    ) -> Result<(), Error> {
        self.get()?.add(dn, object_classes, attributes)
    }

    fn modify(&self, dn: &Dn, changes: &[Modification]) -> Result<(), Error> {
        self.get()?.modify(dn, changes)
    }

    fn delete(&self, dn: &Dn) -> Result<(), Error> {
        self.get()?.delete(dn)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
