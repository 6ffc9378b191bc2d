//! Multi-DC dispatcher.
//!
//! Owns one "main" connection plus extra per-DC connections for file
//! transfer, drives the staged initialization sequence, reconciles the
//! streaming update state and schedules chunked file jobs. Sessions talk
//! back to the dispatcher only through events; jobs are referenced by ID.

#![deny(unsafe_code)]

mod connection;
mod dc_pool;
pub mod errors;
pub mod files;
pub mod session_blob;
pub mod typing;
pub mod updates;

pub use connection::{AuthState, TransportKind};
pub use errors::{InvocationError, MigrateKind, RpcError, UnauthorizedKind};
pub use files::{FileJob, FileJobKind};
pub use session_blob::{BlobError, SessionBlob, FORMAT_VERSION};
pub use typing::{ActionTracker, ExpiredAction};
pub use updates::{PtsCheck, UpdateState};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, timeout};

use tgcore_tl as tl;
use tl::{enums, functions, types, Deserializable};

use connection::Connection;
use dc_pool::DcPool;
use files::AVATAR_LIMIT;
use updates::GET_DIFFERENCE_DEBOUNCE_MS;

// ─── DC addresses ────────────────────────────────────────────────────────────

/// One data-center endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DcAddress {
    /// DC number.
    pub id: u16,
    /// IP address or hostname.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// The endpoints bundled with the library, tried in order on first
/// connect.
pub fn builtin_dc_addresses() -> Vec<DcAddress> {
    [
        (1, "149.154.175.53"),
        (2, "149.154.167.51"),
        (3, "149.154.175.100"),
        (4, "149.154.167.91"),
        (5, "91.108.56.130"),
    ]
    .into_iter()
    .map(|(id, host)| DcAddress { id, host: host.to_string(), port: 443 })
    .collect()
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for [`Dispatcher::connect`].
#[derive(Clone)]
pub struct Config {
    /// Application identifier issued with the API credentials.
    pub api_id: i32,
    /// Application hash issued with the API credentials.
    pub api_hash: String,
    /// Transport framing used by every connection.
    pub transport: TransportKind,
    /// Reconnect automatically after a drop, and wrap around the DC list
    /// during initial bring-up.
    pub auto_reconnect: bool,
    /// Keepalive ping interval.
    pub ping_interval: Duration,
    /// Extra time to wait for the pong before declaring the link dead.
    /// Clamped to at least 500 ms.
    pub ping_grace: Duration,
    /// Device string reported on connection setup.
    pub device_model: String,
    /// OS string reported on connection setup.
    pub system_version: String,
    /// Application version reported on connection setup.
    pub app_version: String,
    /// Language code reported on connection setup.
    pub lang_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_id: 0,
            api_hash: String::new(),
            transport: TransportKind::Abridged,
            auto_reconnect: true,
            ping_interval: Duration::from_secs(15),
            ping_grace: Duration::from_millis(500),
            device_model: "pc".into(),
            system_version: "unknown".into(),
            app_version: env!("CARGO_PKG_VERSION").into(),
            lang_code: "en".into(),
        }
    }
}

// ─── Connection state ────────────────────────────────────────────────────────

/// The user-visible connection state ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live connection.
    Disconnected,
    /// TCP/handshake in progress.
    Connecting,
    /// Channel established, nobody signed in yet.
    Connected,
    /// The DC wants an authorization before serving data.
    AuthRequired,
    /// Signed in; initialization still running.
    Authenticated,
    /// All initialization steps finished.
    Ready,
}

// ─── Initialization bitmask ──────────────────────────────────────────────────

pub(crate) mod steps {
    pub const DC_CONFIGURATION: u32 = 1 << 0;
    pub const SIGN_IN: u32 = 1 << 1;
    pub const KNOW_SELF: u32 = 1 << 2;
    pub const CONTACT_LIST: u32 = 1 << 3;
    pub const CHAT_INFO: u32 = 1 << 4;
    pub const UPDATES: u32 = 1 << 5;
    pub const DONE: u32 = DC_CONFIGURATION | SIGN_IN | KNOW_SELF | CONTACT_LIST | CHAT_INFO | UPDATES;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InitStep {
    DcConfiguration,
    KnowSelf,
    ContactList,
    ChatInfo,
    Updates,
}

/// Progress through the staged bring-up. `requested` prevents a step
/// from ever being issued twice.
#[derive(Debug, Default)]
struct InitProgress {
    completed: u32,
    requested: u32,
}

impl InitProgress {
    fn mark_done(&mut self, step: u32) -> bool {
        if self.completed | step == self.completed {
            return false;
        }
        self.completed |= step;
        true
    }

    /// The next request to issue, if any. Marks it as requested.
    fn next_request(&mut self, signed_in: bool) -> Option<InitStep> {
        if self.requested & steps::DC_CONFIGURATION == 0 {
            self.requested |= steps::DC_CONFIGURATION;
            return Some(InitStep::DcConfiguration);
        }
        if self.completed & steps::DC_CONFIGURATION == 0 {
            return None;
        }
        if signed_in && self.completed & steps::SIGN_IN != 0 {
            if self.requested & steps::KNOW_SELF == 0 {
                self.requested |= steps::KNOW_SELF;
                return Some(InitStep::KnowSelf);
            }
            if self.completed & steps::KNOW_SELF == 0 {
                return None;
            }
            if self.requested & steps::CONTACT_LIST == 0 {
                self.requested |= steps::CONTACT_LIST;
                return Some(InitStep::ContactList);
            }
            if self.requested & steps::CHAT_INFO == 0 {
                self.requested |= steps::CHAT_INFO;
                return Some(InitStep::ChatInfo);
            }
        }
        if self.completed & steps::CONTACT_LIST != 0 && self.requested & steps::UPDATES == 0 {
            self.requested |= steps::UPDATES;
            return Some(InitStep::Updates);
        }
        None
    }

    fn is_done(&self) -> bool {
        self.completed == steps::DONE
    }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// What the dispatcher reports to the embedding application.
#[derive(Clone, Debug)]
pub enum Event {
    /// The connection-state ladder moved.
    StateChanged(ConnectionState),
    /// A new message arrived (possibly reconstructed from a short
    /// update).
    NewMessage {
        /// The full message.
        message: types::Message,
        /// Public flags with the read bit already un-inverted.
        public_flags: u32,
    },
    /// The server assigned an ID to a message we sent.
    MessageSent {
        /// Our random correlation ID.
        random_id: i64,
        /// The server-assigned message ID.
        message_id: i32,
    },
    /// A contact started (`Some`) or stopped (`None`) a chat action.
    ContactAction {
        /// The acting user.
        user_id: i32,
        /// The chat, or `None` for a direct chat.
        chat_id: Option<i32>,
        /// The action, or `None` when it ended.
        action: Option<enums::SendMessageAction>,
    },
    /// An upload moved forward.
    UploadingStatusUpdated {
        /// The job this progress belongs to.
        job_id: u64,
        /// Bytes confirmed so far.
        offset: u64,
        /// Total upload size.
        size: u64,
    },
    /// An upload finished; the value can be attached to outgoing media.
    UploadFinished {
        /// The finished job.
        job_id: u64,
        /// `inputFile` or `inputFileBig` describing the upload.
        input_file: enums::InputFile,
    },
    /// An avatar arrived.
    AvatarReceived {
        /// Whose avatar.
        user_id: i32,
        /// The image bytes.
        bytes: Vec<u8>,
    },
    /// A media download completed.
    MediaReceived {
        /// The message the media belonged to.
        message_id: i32,
        /// The file bytes.
        bytes: Vec<u8>,
    },
    /// The DC option table changed.
    DcConfigurationUpdated,
    /// Two-step verification is required; the hint comes from the
    /// automatic password-info fetch.
    PasswordRequested {
        /// The user's password hint, if set.
        hint: Option<String>,
    },
}

/// Receiving side of the dispatcher's event channel.
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Wait for the next event. `None` once the dispatcher is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

struct DispatcherInner {
    config: Config,
    main: Mutex<Option<Connection>>,
    pool: Mutex<DcPool>,
    state: StdMutex<ConnectionState>,
    init: StdMutex<InitProgress>,
    update_state: StdMutex<UpdateState>,
    dc_options: StdMutex<Vec<DcAddress>>,
    wanted_dc: StdMutex<u16>,
    jobs: StdMutex<HashMap<u64, FileJob>>,
    /// Jobs waiting for the sign-in step before their first round trip.
    queued_jobs: StdMutex<Vec<u64>>,
    next_job_id: AtomicU64,
    typing: StdMutex<ActionTracker>,
    chat_ids: StdMutex<Vec<u32>>,
    self_user_id: StdMutex<i32>,
    auto_reconnect: AtomicBool,
    ping_interval: StdMutex<Duration>,
    ping_grace: StdMutex<Duration>,
    media_buffer_size: StdMutex<u32>,
    event_tx: mpsc::UnboundedSender<Event>,
}

/// The multi-DC orchestrator. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    // ── Construction ───────────────────────────────────────────────────────

    fn build(config: Config) -> (Self, EventStream) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        let auto = config.auto_reconnect;
        let ping_interval = config.ping_interval;
        let ping_grace = config.ping_grace.max(Duration::from_millis(500));
        let inner = Arc::new(DispatcherInner {
            config,
            main: Mutex::new(None),
            pool: Mutex::new(DcPool::new()),
            state: StdMutex::new(ConnectionState::Disconnected),
            init: StdMutex::new(InitProgress::default()),
            update_state: StdMutex::new(UpdateState::new()),
            dc_options: StdMutex::new(builtin_dc_addresses()),
            wanted_dc: StdMutex::new(0),
            jobs: StdMutex::new(HashMap::new()),
            queued_jobs: StdMutex::new(Vec::new()),
            next_job_id: AtomicU64::new(1),
            typing: StdMutex::new(ActionTracker::new()),
            chat_ids: StdMutex::new(Vec::new()),
            self_user_id: StdMutex::new(0),
            auto_reconnect: AtomicBool::new(auto),
            ping_interval: StdMutex::new(ping_interval),
            ping_grace: StdMutex::new(ping_grace),
            media_buffer_size: StdMutex::new(files::DEFAULT_MEDIA_BUFFER),
            event_tx,
        });
        (Self { inner }, EventStream { rx })
    }

    /// Connect to the network: cycle through the DC list until one
    /// handshake succeeds, then run the initialization sequence as far
    /// as the (not yet signed-in) session allows.
    pub async fn connect(config: Config) -> Result<(Self, EventStream), InvocationError> {
        let (this, stream) = Self::build(config);
        this.establish_initial().await?;
        this.continue_initialization(0).await?;
        Ok((this, stream))
    }

    /// Resume from a persisted blob without re-running the handshake.
    pub async fn resume(
        config: Config,
        blob: &SessionBlob,
    ) -> Result<(Self, EventStream), InvocationError> {
        let (this, stream) = Self::build(config);

        {
            let mut st = this.inner.update_state.lock().unwrap();
            st.set(blob.pts, 0, blob.date);
            st.set_qts(blob.qts);
        }
        *this.inner.chat_ids.lock().unwrap() = blob.chat_ids.clone();

        this.set_state(ConnectionState::Connecting);
        let mut conn = Connection::connect_with_key(
            blob.dc.clone(),
            this.inner.config.transport,
            blob.auth_key,
            blob.server_salt as i64,
            blob.delta_time,
        )
        .await?;
        if conn.engine.enc.auth_id() != blob.auth_id {
            log::warn!("resume blob auth_id does not match its key");
            return Err(InvocationError::Unauthorized(UnauthorizedKind::KeyUnregistered));
        }
        conn.auth_state = AuthState::SignedIn;
        *this.inner.main.lock().await = Some(conn);
        this.set_state(ConnectionState::Connected);

        this.inner.init.lock().unwrap().mark_done(steps::SIGN_IN);
        this.continue_initialization(0).await?;
        Ok((this, stream))
    }

    /// Capture everything needed to resume later.
    pub async fn snapshot(&self) -> Result<SessionBlob, InvocationError> {
        let main = self.inner.main.lock().await;
        let conn = main.as_ref().ok_or(InvocationError::Dropped)?;
        let (pts, qts, date) = {
            let st = self.inner.update_state.lock().unwrap();
            (st.pts, st.qts, st.date)
        };
        Ok(SessionBlob {
            delta_time: conn.engine.enc.delta_time,
            dc: conn.dc.clone(),
            auth_key: conn.engine.enc.auth_key_bytes(),
            auth_id: conn.engine.enc.auth_id(),
            server_salt: conn.engine.enc.salt as u64,
            pts,
            qts,
            date,
            chat_ids: self.inner.chat_ids.lock().unwrap().clone(),
        })
    }

    // ── Tunables ───────────────────────────────────────────────────────────

    /// Change the keepalive cadence. The grace is clamped to ≥ 500 ms.
    pub fn set_ping_interval(&self, interval: Duration, grace: Duration) {
        *self.inner.ping_interval.lock().unwrap() = interval;
        *self.inner.ping_grace.lock().unwrap() = grace.max(Duration::from_millis(500));
    }

    /// Change the download chunk size. Must be divisible by 256; zero
    /// selects the default.
    pub fn set_media_buffer_size(&self, size: u32) {
        if size % 256 != 0 {
            log::warn!("media buffer size {size} is not divisible by 256; keeping current");
            return;
        }
        let size = if size == 0 { files::DEFAULT_MEDIA_BUFFER } else { size };
        *self.inner.media_buffer_size.lock().unwrap() = size;
    }

    /// Enable or disable automatic reconnection.
    pub fn set_auto_reconnection(&self, enabled: bool) {
        self.inner.auto_reconnect.store(enabled, Ordering::Relaxed);
    }

    /// The current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.state.lock().unwrap()
    }

    // ── State plumbing ─────────────────────────────────────────────────────

    fn set_state(&self, state: ConnectionState) {
        let changed = {
            let mut current = self.inner.state.lock().unwrap();
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        };
        if changed {
            log::debug!("connection state: {state:?}");
            let _ = self.inner.event_tx.send(Event::StateChanged(state));
        }
    }

    fn emit(&self, event: Event) {
        let _ = self.inner.event_tx.send(event);
    }

    fn dc_address(&self, dc: u16) -> Option<DcAddress> {
        self.inner.dc_options.lock().unwrap().iter().find(|a| a.id == dc).cloned()
    }

    async fn main_auth_state(&self) -> Option<AuthState> {
        self.inner.main.lock().await.as_ref().map(|c| c.auth_state)
    }

    // ── Initial bring-up and reconnection ──────────────────────────────────

    async fn establish_initial(&self) -> Result<(), InvocationError> {
        self.set_state(ConnectionState::Connecting);
        let addresses = self.inner.dc_options.lock().unwrap().clone();
        let mut index = 0;
        loop {
            let addr = addresses[index].clone();
            match timeout(
                Duration::from_secs(10),
                Connection::connect(addr, self.inner.config.transport, 0),
            )
            .await
            {
                Ok(Ok(conn)) => {
                    *self.inner.wanted_dc.lock().unwrap() = conn.dc.id;
                    *self.inner.main.lock().await = Some(conn);
                    self.set_state(ConnectionState::Connected);
                    return Ok(());
                }
                Ok(Err(e)) => log::warn!("connect to DC index {index} failed: {e}"),
                Err(_) => log::warn!("connect to DC index {index} timed out"),
            }
            index += 1;
            if index >= addresses.len() {
                if self.inner.auto_reconnect.load(Ordering::Relaxed) {
                    log::warn!("all addresses failed; wrapping around");
                    index = 0;
                } else {
                    self.set_state(ConnectionState::Disconnected);
                    return Err(InvocationError::Dropped);
                }
            }
        }
    }

    /// Reconnect the main session after a drop, reusing the negotiated
    /// key and replaying any content-related requests that were never
    /// acknowledged.
    async fn reconnect_main(&self) -> Result<(), InvocationError> {
        self.set_state(ConnectionState::Disconnected);
        if !self.inner.auto_reconnect.load(Ordering::Relaxed) {
            return Err(InvocationError::Dropped);
        }
        sleep(Duration::from_secs(1)).await;
        self.set_state(ConnectionState::Connecting);

        let (dc, key, salt, delta, auth_state, unacked) = {
            let mut main = self.inner.main.lock().await;
            let conn = main.as_mut().ok_or(InvocationError::Dropped)?;
            (
                conn.dc.clone(),
                conn.engine.enc.auth_key_bytes(),
                conn.engine.enc.salt,
                conn.engine.enc.delta_time,
                conn.auth_state,
                conn.engine.take_unacked_bodies(),
            )
        };

        let mut conn = Connection::connect_with_key(
            dc,
            self.inner.config.transport,
            key,
            salt,
            delta,
        )
        .await?;
        conn.auth_state = auth_state;
        for body in unacked {
            let (wire, _) = conn.engine.pack_request_body(body, true);
            conn.send_frame(&wire).await?;
        }
        *self.inner.main.lock().await = Some(conn);
        self.set_state(ConnectionState::Connected);

        if let Err(e) = self.get_difference().await {
            log::warn!("difference fetch after reconnect failed: {e}");
        }
        Ok(())
    }

    // ── RPC plumbing ───────────────────────────────────────────────────────

    /// Invoke on the main connection; a migration error re-points the
    /// main connection and re-issues the request once.
    async fn invoke_main_raw<R: tl::RemoteCall>(
        &self,
        req: &R,
    ) -> Result<Vec<u8>, InvocationError> {
        let first = {
            let mut main = self.inner.main.lock().await;
            let conn = main.as_mut().ok_or(InvocationError::Dropped)?;
            conn.invoke_raw(req).await.map_err(InvocationError::classify)
        };
        match first {
            Err(InvocationError::Migrate(kind, dc)) => {
                log::info!("server wants us on DC{dc} ({kind:?}); moving main connection");
                self.migrate_to(dc).await?;
                let mut main = self.inner.main.lock().await;
                let conn = main.as_mut().ok_or(InvocationError::Dropped)?;
                conn.invoke_raw(req).await.map_err(InvocationError::classify)
            }
            other => other,
        }
    }

    async fn invoke_main<R: tl::RemoteCall>(&self, req: &R) -> Result<R::Return, InvocationError> {
        let body = self.invoke_main_raw(req).await?;
        Ok(R::Return::from_bytes(&body)?)
    }

    /// Invoke on the main connection without the migration retry. Used by
    /// the requests migration handling itself issues, so redirect handling
    /// never re-enters itself.
    async fn invoke_main_plain<R: tl::RemoteCall>(
        &self,
        req: &R,
    ) -> Result<R::Return, InvocationError> {
        let body = {
            let mut main = self.inner.main.lock().await;
            let conn = main.as_mut().ok_or(InvocationError::Dropped)?;
            conn.invoke_raw(req).await.map_err(InvocationError::classify)?
        };
        Ok(R::Return::from_bytes(&body)?)
    }

    /// Invoke on a specific DC, routing through the main connection when
    /// it already points there and auto-creating an extra signed-in
    /// connection otherwise.
    async fn invoke_on_dc<R: tl::RemoteCall>(
        &self,
        dc: u16,
        req: &R,
    ) -> Result<Vec<u8>, InvocationError> {
        {
            let mut main = self.inner.main.lock().await;
            if let Some(conn) = main.as_mut() {
                if conn.dc.id == dc {
                    return conn.invoke_raw(req).await.map_err(InvocationError::classify);
                }
            }
        }
        self.ensure_extra_connection(dc).await?;
        let mut pool = self.inner.pool.lock().await;
        let conn = pool.get_mut(dc).ok_or(InvocationError::Dropped)?;
        conn.invoke_raw(req).await.map_err(InvocationError::classify)
    }

    /// Bring up (and sign into) an extra connection for `dc` if none
    /// exists. The new session copies the main session's clock offset and
    /// negotiates its own key; the sign-in rides on an exported
    /// authorization so the user is never prompted again.
    async fn ensure_extra_connection(&self, dc: u16) -> Result<(), InvocationError> {
        if self.inner.pool.lock().await.has(dc) {
            return Ok(());
        }

        let addr = match self.dc_address(dc) {
            Some(a) => a,
            None => {
                self.request_dc_config_inner().await?;
                self.dc_address(dc).ok_or(InvocationError::Dropped)?
            }
        };
        let delta = {
            let main = self.inner.main.lock().await;
            main.as_ref().map(|c| c.engine.enc.delta_time).unwrap_or(0)
        };

        let mut conn = Connection::connect(addr, self.inner.config.transport, delta).await?;

        let exported = self.inner.pool.lock().await.exported_for(dc);
        let (id, bytes) = match exported {
            Some(pair) => pair,
            None => {
                let enums::auth::ExportedAuthorization::ExportedAuthorization(exported) = self
                    .invoke_main::<functions::auth::ExportAuthorization>(
                        &functions::auth::ExportAuthorization { dc_id: i32::from(dc) },
                    )
                    .await?;
                self.inner
                    .pool
                    .lock()
                    .await
                    .note_exported(dc, exported.id, exported.bytes.clone());
                (exported.id, exported.bytes)
            }
        };

        let _authorization = conn
            .invoke::<functions::auth::ImportAuthorization>(&functions::auth::ImportAuthorization {
                id,
                bytes,
            })
            .await?;
        conn.auth_state = AuthState::SignedIn;
        self.inner.pool.lock().await.insert(dc, conn);
        Ok(())
    }

    /// Tear down the current main connection and bring the wanted DC up
    /// as the new main.
    pub async fn migrate_to(&self, dc: u16) -> Result<(), InvocationError> {
        *self.inner.wanted_dc.lock().unwrap() = dc;
        let addr = match self.dc_address(dc) {
            Some(a) => a,
            None => {
                self.request_dc_config_inner().await?;
                self.dc_address(dc).ok_or(InvocationError::Dropped)?
            }
        };
        let delta = {
            let main = self.inner.main.lock().await;
            main.as_ref().map(|c| c.engine.enc.delta_time).unwrap_or(0)
        };

        self.set_state(ConnectionState::Connecting);
        let conn = Connection::connect(addr, self.inner.config.transport, delta).await?;
        *self.inner.main.lock().await = Some(conn);
        self.set_state(ConnectionState::Connected);

        // Announce ourselves on the new DC and refresh its option table.
        self.request_dc_config_inner().await?;
        Ok(())
    }

    // ── Initialization sequence ────────────────────────────────────────────

    async fn continue_initialization(&self, just_done: u32) -> Result<(), InvocationError> {
        if just_done != 0 && !self.inner.init.lock().unwrap().mark_done(just_done) {
            return Ok(());
        }

        // Sign-in completion releases any file jobs parked on it.
        if self.sign_in_complete() {
            self.drain_queued_jobs();
        }

        loop {
            let signed_in = self.main_auth_state().await == Some(AuthState::SignedIn);
            let next = self.inner.init.lock().unwrap().next_request(signed_in);
            let Some(step) = next else { break };

            match step {
                InitStep::DcConfiguration => {
                    self.request_dc_config_inner().await?;
                    self.inner.init.lock().unwrap().mark_done(steps::DC_CONFIGURATION);
                    self.set_state(if signed_in {
                        ConnectionState::Authenticated
                    } else {
                        ConnectionState::AuthRequired
                    });
                }
                InitStep::KnowSelf => {
                    let users = self
                        .invoke_main::<functions::users::GetUsers>(&functions::users::GetUsers {
                            id: vec![enums::InputUser::UserSelf],
                        })
                        .await?;
                    if let Some(enums::User::User(me)) = users.into_iter().next() {
                        *self.inner.self_user_id.lock().unwrap() = me.id;
                    }
                    self.inner.init.lock().unwrap().mark_done(steps::KNOW_SELF);
                }
                InitStep::ContactList => {
                    let _contacts = self
                        .invoke_main::<functions::contacts::GetContacts>(
                            &functions::contacts::GetContacts { hash: String::new() },
                        )
                        .await?;
                    self.inner.init.lock().unwrap().mark_done(steps::CONTACT_LIST);
                }
                InitStep::ChatInfo => {
                    let ids: Vec<i32> = self
                        .inner
                        .chat_ids
                        .lock()
                        .unwrap()
                        .iter()
                        .map(|&id| id as i32)
                        .collect();
                    if !ids.is_empty() {
                        let _chats = self
                            .invoke_main::<functions::messages::GetChats>(
                                &functions::messages::GetChats { id: ids },
                            )
                            .await?;
                    }
                    self.inner.init.lock().unwrap().mark_done(steps::CHAT_INFO);
                }
                InitStep::Updates => {
                    self.sync_update_state().await?;
                    self.inner.init.lock().unwrap().mark_done(steps::UPDATES);
                }
            }
        }

        if self.inner.init.lock().unwrap().is_done() {
            self.set_state(ConnectionState::Ready);
        }
        Ok(())
    }

    async fn request_dc_config_inner(&self) -> Result<(), InvocationError> {
        let req = functions::InvokeWithLayer {
            layer: tl::LAYER,
            query: functions::InitConnection {
                api_id: self.inner.config.api_id,
                device_model: self.inner.config.device_model.clone(),
                system_version: self.inner.config.system_version.clone(),
                app_version: self.inner.config.app_version.clone(),
                lang_code: self.inner.config.lang_code.clone(),
                query: functions::help::GetConfig {},
            },
        };
        let enums::Config::Config(config) = self.invoke_main_plain(&req).await?;

        let options: Vec<DcAddress> = config
            .dc_options
            .iter()
            .map(|enums::DcOption::DcOption(o)| DcAddress {
                id: o.id as u16,
                host: if o.ip_address.is_empty() { o.hostname.clone() } else { o.ip_address.clone() },
                port: o.port as u16,
            })
            .collect();
        if !options.is_empty() {
            *self.inner.dc_options.lock().unwrap() = options;
            self.emit(Event::DcConfigurationUpdated);
        }
        Ok(())
    }

    // ── Authorization ──────────────────────────────────────────────────────

    /// Request a login code for `phone`. Returns the code hash needed by
    /// [`Dispatcher::sign_in`].
    pub async fn send_code(&self, phone: &str) -> Result<String, InvocationError> {
        let req = functions::auth::SendCode {
            phone_number: phone.to_string(),
            sms_type: 0,
            api_id: self.inner.config.api_id,
            api_hash: self.inner.config.api_hash.clone(),
            lang_code: self.inner.config.lang_code.clone(),
        };
        let enums::auth::SentCode::SentCode(sent) = self.invoke_main::<_>(&req).await?;
        Ok(sent.phone_code_hash)
    }

    /// Sign in with the code the user received. A two-step-verification
    /// account triggers an automatic password-info fetch before the
    /// `PasswordNeeded` error is surfaced.
    pub async fn sign_in(
        &self,
        phone: &str,
        phone_code_hash: &str,
        code: &str,
    ) -> Result<(), InvocationError> {
        let req = functions::auth::SignIn {
            phone_number: phone.to_string(),
            phone_code_hash: phone_code_hash.to_string(),
            phone_code: code.to_string(),
        };
        match self.invoke_main::<_>(&req).await {
            Ok(enums::auth::Authorization::Authorization(auth)) => {
                if let enums::User::User(me) = &auth.user {
                    *self.inner.self_user_id.lock().unwrap() = me.id;
                }
                {
                    let mut main = self.inner.main.lock().await;
                    if let Some(conn) = main.as_mut() {
                        conn.auth_state = AuthState::SignedIn;
                    }
                }
                self.continue_initialization(steps::SIGN_IN).await
            }
            Err(InvocationError::Unauthorized(UnauthorizedKind::PasswordNeeded)) => {
                let hint = match self
                    .invoke_main::<functions::account::GetPassword>(
                        &functions::account::GetPassword {},
                    )
                    .await
                {
                    Ok(enums::account::Password::Password(p)) if !p.hint.is_empty() => {
                        Some(p.hint)
                    }
                    _ => None,
                };
                self.emit(Event::PasswordRequested { hint });
                Err(InvocationError::Unauthorized(UnauthorizedKind::PasswordNeeded))
            }
            Err(e) => Err(e),
        }
    }

    // ── Update stream ──────────────────────────────────────────────────────

    /// Drive the main connection: deliver pushed updates, expire typing
    /// actions and keep the link alive with pings. Runs until the
    /// connection drops with auto-reconnect disabled.
    pub async fn run(&self) {
        let mut idle = Duration::ZERO;
        let tick = Duration::from_millis(500);
        loop {
            let received = {
                let mut main = self.inner.main.lock().await;
                match main.as_mut() {
                    Some(conn) => conn.recv_updates(tick).await,
                    None => break,
                }
            };

            match received {
                Ok(batch) => {
                    if batch.is_empty() {
                        idle += tick;
                    } else {
                        idle = Duration::ZERO;
                    }
                    for updates in batch {
                        self.process_updates(updates).await;
                    }
                }
                Err(e) => {
                    log::warn!("main connection failed: {e}; scheduling reconnect");
                    idle = Duration::ZERO;
                    if self.reconnect_main().await.is_err() {
                        break;
                    }
                    continue;
                }
            }

            // Typing lists share one repeating timer.
            let expired = self.inner.typing.lock().unwrap().tick(tick);
            for action in expired {
                self.emit(Event::ContactAction {
                    user_id: action.user_id,
                    chat_id: action.chat_id,
                    action: None,
                });
            }

            let (interval, grace) = (
                *self.inner.ping_interval.lock().unwrap(),
                *self.inner.ping_grace.lock().unwrap(),
            );
            if idle >= interval {
                idle = Duration::ZERO;
                let pinged = {
                    let mut main = self.inner.main.lock().await;
                    match main.as_mut() {
                        Some(conn) => timeout(interval + grace, conn.ping()).await,
                        None => break,
                    }
                };
                match pinged {
                    Ok(Ok(())) => {}
                    _ => {
                        log::warn!("keepalive pong missing; reconnecting");
                        if self.reconnect_main().await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
        self.set_state(ConnectionState::Disconnected);
    }

    /// Apply one pushed `Updates` payload.
    pub async fn process_updates(&self, updates: enums::Updates) {
        match updates {
            enums::Updates::TooLong => {
                log::debug!("updates too long; resyncing state");
                self.schedule_difference();
            }
            enums::Updates::ShortMessage(short) => {
                let self_id = *self.inner.self_user_id.lock().unwrap();
                let cleared = self.inner.typing.lock().unwrap().clear_remote(short.user_id, None);
                if cleared {
                    self.emit(Event::ContactAction {
                        user_id: short.user_id,
                        chat_id: None,
                        action: None,
                    });
                }
                let full = updates::expand_short_message(&short, self_id);
                self.process_update(enums::Update::NewMessage(full)).await;
            }
            enums::Updates::ShortChatMessage(short) => {
                let cleared = self
                    .inner
                    .typing
                    .lock()
                    .unwrap()
                    .clear_remote(short.from_id, Some(short.chat_id));
                if cleared {
                    self.emit(Event::ContactAction {
                        user_id: short.from_id,
                        chat_id: Some(short.chat_id),
                        action: None,
                    });
                }
                let full = updates::expand_short_chat_message(&short);
                self.process_update(enums::Update::NewMessage(full)).await;
            }
            enums::Updates::Short(short) => {
                self.process_update(short.update).await;
            }
            enums::Updates::Combined(combined) => {
                // Ordering semantics of seq_start ranges are unspecified
                // for this client; resync instead of guessing.
                log::warn!(
                    "rejecting updatesCombined (seq {}..{}); resyncing via difference",
                    combined.seq_start,
                    combined.seq
                );
                self.schedule_difference();
            }
            enums::Updates::Updates(batch) => {
                {
                    let mut st = self.inner.update_state.lock().unwrap();
                    let pts = st.pts;
                    st.ensure(pts, batch.seq, batch.date as u32);
                }
                for update in batch.updates {
                    self.process_update(update).await;
                }
            }
        }
    }

    /// Apply one update, running the gap check for the pts-bearing kinds.
    async fn process_update(&self, update: enums::Update) {
        if let Some((pts, pts_count)) = updates::pts_of(&update) {
            let verdict = {
                let st = self.inner.update_state.lock().unwrap();
                if st.is_locked() {
                    log::debug!("update state locked; deferring pts {pts}");
                    return;
                }
                st.check_pts(pts, pts_count)
            };
            match verdict {
                PtsCheck::Apply => {
                    let mut st = self.inner.update_state.lock().unwrap();
                    st.ensure(pts, 0, 0);
                }
                PtsCheck::Gap { expected, got } => {
                    log::debug!("pts mismatch: expected {expected}, got {got}; fetching difference");
                    self.schedule_difference();
                    return;
                }
            }
        }

        match update {
            enums::Update::NewMessage(u) => {
                if let enums::Message::Message(message) = u.message {
                    let cleared = self
                        .inner
                        .typing
                        .lock()
                        .unwrap()
                        .clear_remote(message.from_id, None);
                    if cleared {
                        self.emit(Event::ContactAction {
                            user_id: message.from_id,
                            chat_id: None,
                            action: None,
                        });
                    }
                    let public_flags = updates::public_message_flags(&message);
                    self.emit(Event::NewMessage { message, public_flags });
                }
            }
            enums::Update::MessageId(u) => {
                self.emit(Event::MessageSent { random_id: u.random_id, message_id: u.id });
            }
            enums::Update::UserTyping(u) => {
                self.inner.typing.lock().unwrap().note_remote(u.user_id, None, u.action);
                self.emit(Event::ContactAction {
                    user_id: u.user_id,
                    chat_id: None,
                    action: Some(u.action),
                });
            }
            enums::Update::ChatUserTyping(u) => {
                self.inner
                    .typing
                    .lock()
                    .unwrap()
                    .note_remote(u.user_id, Some(u.chat_id), u.action);
                self.emit(Event::ContactAction {
                    user_id: u.user_id,
                    chat_id: Some(u.chat_id),
                    action: Some(u.action),
                });
            }
            enums::Update::DcOptions(u) => {
                self.merge_dc_options(&u.dc_options);
                self.emit(Event::DcConfigurationUpdated);
            }
            enums::Update::ReadHistoryInbox(_)
            | enums::Update::ReadHistoryOutbox(_)
            | enums::Update::DeleteMessages(_)
            | enums::Update::ReadMessagesContents(_) => {
                // State already advanced above; nothing to surface yet.
            }
        }
    }

    fn merge_dc_options(&self, incoming: &[enums::DcOption]) {
        let mut table = self.inner.dc_options.lock().unwrap();
        let mut next = table.clone();
        for enums::DcOption::DcOption(o) in incoming {
            let addr = DcAddress {
                id: o.id as u16,
                host: if o.ip_address.is_empty() { o.hostname.clone() } else { o.ip_address.clone() },
                port: o.port as u16,
            };
            match next.iter_mut().find(|a| a.id == addr.id) {
                Some(slot) => *slot = addr,
                None => next.push(addr),
            }
        }
        *table = next;
    }

    /// Lock the update state and fetch the difference after a short
    /// debounce, so a burst of gapped updates costs one round trip.
    fn schedule_difference(&self) {
        {
            let mut st = self.inner.update_state.lock().unwrap();
            if st.is_locked() {
                return;
            }
            st.lock();
        }
        let this = self.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(GET_DIFFERENCE_DEBOUNCE_MS)).await;
            if let Err(e) = this.get_difference().await {
                log::warn!("difference fetch failed: {e}");
                this.inner.update_state.lock().unwrap().unlock();
            }
        });
    }

    /// Fetch and apply everything missed since the local state.
    pub async fn get_difference(&self) -> Result<(), InvocationError> {
        loop {
            let (pts, qts, date) = {
                let st = self.inner.update_state.lock().unwrap();
                (st.pts, st.qts, st.date)
            };
            let req = functions::updates::GetDifference { pts, date, qts };
            let diff = self.invoke_main::<_>(&req).await?;

            match diff {
                enums::updates::Difference::Empty(empty) => {
                    let mut st = self.inner.update_state.lock().unwrap();
                    let pts = st.pts;
                    st.set(pts, empty.seq, empty.date);
                    st.unlock();
                    return Ok(());
                }
                enums::updates::Difference::Difference(diff) => {
                    self.apply_difference_payload(diff.new_messages, diff.other_updates);
                    self.inner.update_state.lock().unwrap().apply_server_state(&diff.state);
                    return Ok(());
                }
                enums::updates::Difference::Slice(slice) => {
                    self.apply_difference_payload(slice.new_messages, slice.other_updates);
                    self.inner
                        .update_state
                        .lock()
                        .unwrap()
                        .apply_server_state(&slice.intermediate_state);
                    // More to fetch; loop with the intermediate state.
                }
                enums::updates::Difference::TooLong(too_long) => {
                    {
                        let mut st = self.inner.update_state.lock().unwrap();
                        st.set(too_long.pts, 0, 0);
                        st.unlock();
                    }
                    return self.sync_update_state().await;
                }
            }
        }
    }

    fn apply_difference_payload(
        &self,
        new_messages: Vec<enums::Message>,
        other_updates: Vec<enums::Update>,
    ) {
        for message in new_messages {
            if let enums::Message::Message(message) = message {
                let public_flags = updates::public_message_flags(&message);
                self.emit(Event::NewMessage { message, public_flags });
            }
        }
        for update in other_updates {
            match update {
                enums::Update::MessageId(u) => {
                    self.emit(Event::MessageSent { random_id: u.random_id, message_id: u.id });
                }
                enums::Update::DcOptions(u) => {
                    self.merge_dc_options(&u.dc_options);
                    self.emit(Event::DcConfigurationUpdated);
                }
                _ => {}
            }
        }
    }

    /// Ask the server for its current update state and adopt it.
    pub async fn sync_update_state(&self) -> Result<(), InvocationError> {
        let enums::updates::State::State(state) = self
            .invoke_main::<functions::updates::GetState>(&functions::updates::GetState {})
            .await?;
        self.inner.update_state.lock().unwrap().apply_server_state(&state);
        log::debug!("update state synced: pts={} qts={} seq={}", state.pts, state.qts, state.seq);
        Ok(())
    }

    // ── Typing actions ─────────────────────────────────────────────────────

    /// Emit a chat action unless one is already live for `peer`.
    pub async fn set_typing(
        &self,
        peer: enums::InputPeer,
        action: enums::SendMessageAction,
    ) -> Result<(), InvocationError> {
        let allowed = self.inner.typing.lock().unwrap().note_local(&peer);
        if !allowed {
            return Ok(());
        }
        let _ = self
            .invoke_main::<functions::messages::SetTyping>(&functions::messages::SetTyping {
                peer,
                action,
            })
            .await?;
        Ok(())
    }

    // ── File jobs ──────────────────────────────────────────────────────────

    fn allocate_job(&self, job: FileJob) -> u64 {
        let id = job.id;
        self.inner.jobs.lock().unwrap().insert(id, job);
        id
    }

    fn next_job_id(&self) -> u64 {
        self.inner.next_job_id.fetch_add(1, Ordering::Relaxed)
    }

    fn sign_in_complete(&self) -> bool {
        self.inner.init.lock().unwrap().completed & steps::SIGN_IN != 0
    }

    /// Start `job_id` now if the session is signed in; otherwise keep it
    /// queued. Every job needs a signed-in main session for its first
    /// round trip (directly, or for the authorization export a foreign DC
    /// requires).
    fn schedule_job(&self, job_id: u64) {
        if self.sign_in_complete() {
            self.spawn_job_runner(job_id);
        } else {
            log::debug!("file job {job_id} queued until sign-in completes");
            self.inner.queued_jobs.lock().unwrap().push(job_id);
        }
    }

    /// Start every job held back while the session was unauthenticated.
    fn drain_queued_jobs(&self) {
        let queued: Vec<u64> = std::mem::take(&mut *self.inner.queued_jobs.lock().unwrap());
        for job_id in queued {
            self.spawn_job_runner(job_id);
        }
    }

    fn spawn_job_runner(&self, job_id: u64) {
        let kind = {
            let jobs = self.inner.jobs.lock().unwrap();
            match jobs.get(&job_id) {
                Some(job) => job.kind.clone(),
                None => return,
            }
        };
        let this = self.clone();
        tokio::spawn(async move {
            let result = match kind {
                FileJobKind::Upload { .. } => this.run_upload(job_id).await,
                FileJobKind::Avatar { .. } => this.run_avatar(job_id).await,
                FileJobKind::MediaDownload { .. } => this.run_media_download(job_id).await,
            };
            if let Err(e) = result {
                log::warn!("file job {job_id} failed: {e}");
            }
            this.inner.jobs.lock().unwrap().remove(&job_id);
        });
    }

    /// Upload a byte buffer under `file_name`. Chunks are pushed in the
    /// background; progress and completion arrive as events. Jobs created
    /// before sign-in wait for it instead of failing.
    pub async fn upload_file(&self, data: Vec<u8>, file_name: &str) -> u64 {
        let dc = {
            let main = self.inner.main.lock().await;
            main.as_ref().map(|c| c.dc.id).unwrap_or(0)
        };
        let job = FileJob::upload(self.next_job_id(), data, file_name, dc);
        let job_id = self.allocate_job(job);
        self.schedule_job(job_id);
        job_id
    }

    async fn run_upload(&self, job_id: u64) -> Result<(), InvocationError> {
        // A job queued before the first connection has no DC yet; it goes
        // to wherever the main session ended up.
        {
            let main_dc = {
                let main = self.inner.main.lock().await;
                main.as_ref().map(|c| c.dc.id)
            };
            if let Some(main_dc) = main_dc {
                let mut jobs = self.inner.jobs.lock().unwrap();
                if let Some(job) = jobs.get_mut(&job_id) {
                    if job.dc == 0 {
                        job.dc = main_dc;
                    }
                }
            }
        }
        loop {
            let (dc, big, file_id, part, total_parts, chunk, finished) = {
                let jobs = self.inner.jobs.lock().unwrap();
                let job = jobs.get(&job_id).ok_or(InvocationError::Dropped)?;
                (
                    job.dc,
                    job.is_big(),
                    job.file_id(),
                    job.part,
                    job.parts(),
                    job.current_chunk().to_vec(),
                    job.finished(),
                )
            };
            if finished {
                return Ok(());
            }

            if big {
                self.invoke_on_dc(
                    dc,
                    &functions::upload::SaveBigFilePart {
                        file_id,
                        file_part: part as i32,
                        file_total_parts: total_parts as i32,
                        bytes: chunk,
                    },
                )
                .await?;
            } else {
                self.invoke_on_dc(
                    dc,
                    &functions::upload::SaveFilePart {
                        file_id,
                        file_part: part as i32,
                        bytes: chunk,
                    },
                )
                .await?;
            }

            let done = {
                let mut jobs = self.inner.jobs.lock().unwrap();
                let job = jobs.get_mut(&job_id).ok_or(InvocationError::Dropped)?;
                job.bump_part();
                self.emit(Event::UploadingStatusUpdated {
                    job_id,
                    offset: job.offset,
                    size: job.size,
                });
                if job.finished() {
                    self.emit(Event::UploadFinished { job_id, input_file: job.input_file() });
                    true
                } else {
                    false
                }
            };
            if done {
                return Ok(());
            }
        }
    }

    /// Fetch `user`'s avatar in a single request. Returns the job ID, or
    /// `None` when the user has no downloadable photo.
    pub fn request_avatar(&self, user: &types::User) -> Option<u64> {
        let job = FileJob::avatar(self.next_job_id(), user)?;
        let job_id = self.allocate_job(job);
        self.schedule_job(job_id);
        Some(job_id)
    }

    async fn run_avatar(&self, job_id: u64) -> Result<(), InvocationError> {
        let (dc, location, user_id) = {
            let jobs = self.inner.jobs.lock().unwrap();
            let job = jobs.get(&job_id).ok_or(InvocationError::Dropped)?;
            let FileJobKind::Avatar { user_id } = &job.kind else {
                return Err(InvocationError::Dropped);
            };
            (job.dc, job.location.clone().ok_or(InvocationError::Dropped)?, *user_id)
        };

        let body = self
            .invoke_on_dc(
                dc,
                &functions::upload::GetFile { location, offset: 0, limit: AVATAR_LIMIT },
            )
            .await?;
        let enums::upload::File::File(file) = enums::upload::File::from_bytes(&body)?;
        self.emit(Event::AvatarReceived { user_id, bytes: file.bytes });
        Ok(())
    }

    /// Download the media attachment of `message` chunk by chunk.
    /// Returns the job ID, or `None` when the message has nothing to
    /// download.
    pub fn request_media(&self, message: &types::Message) -> Option<u64> {
        let mut job = FileJob::media_download(self.next_job_id(), message)?;
        job.set_download_chunk(*self.inner.media_buffer_size.lock().unwrap());
        let job_id = self.allocate_job(job);
        self.schedule_job(job_id);
        Some(job_id)
    }

    async fn run_media_download(&self, job_id: u64) -> Result<(), InvocationError> {
        loop {
            let (dc, location, offset, limit, message_id, size) = {
                let jobs = self.inner.jobs.lock().unwrap();
                let job = jobs.get(&job_id).ok_or(InvocationError::Dropped)?;
                let FileJobKind::MediaDownload { message_id } = &job.kind else {
                    return Err(InvocationError::Dropped);
                };
                (
                    job.dc,
                    job.location.clone().ok_or(InvocationError::Dropped)?,
                    job.offset,
                    job.chunk_size(),
                    *message_id,
                    job.size,
                )
            };

            let body = self
                .invoke_on_dc(
                    dc,
                    &functions::upload::GetFile {
                        location,
                        offset: offset as i32,
                        limit: limit as i32,
                    },
                )
                .await?;
            let enums::upload::File::File(file) = enums::upload::File::from_bytes(&body)?;

            let finished = {
                let mut jobs = self.inner.jobs.lock().unwrap();
                let job = jobs.get_mut(&job_id).ok_or(InvocationError::Dropped)?;
                let got = file.bytes.len() as u32;
                job.push_received(&file.bytes);
                got < limit || (size > 0 && job.offset >= size)
            };
            if finished {
                let bytes = {
                    let mut jobs = self.inner.jobs.lock().unwrap();
                    jobs.get_mut(&job_id).ok_or(InvocationError::Dropped)?.take_data()
                };
                self.emit(Event::MediaReceived { message_id, bytes });
                return Ok(());
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dc_list_shape() {
        let list = builtin_dc_addresses();
        assert_eq!(list.len(), 5);
        assert!(list.iter().all(|a| a.port == 443));
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn config_defaults() {
        let c = Config::default();
        assert_eq!(c.ping_interval, Duration::from_secs(15));
        assert!(c.auto_reconnect);
        assert_eq!(c.transport, TransportKind::Abridged);
    }

    #[test]
    fn init_steps_run_once_and_in_order() {
        let mut init = InitProgress::default();

        // Nothing but the DC configuration until it completes.
        assert_eq!(init.next_request(false), Some(InitStep::DcConfiguration));
        assert_eq!(init.next_request(false), None, "config must not be requested twice");
        init.mark_done(steps::DC_CONFIGURATION);

        // Not signed in: only the update state remains out of reach.
        assert_eq!(init.next_request(false), None);

        // Sign-in unlocks the authorized steps, strictly sequenced.
        init.mark_done(steps::SIGN_IN);
        assert_eq!(init.next_request(true), Some(InitStep::KnowSelf));
        assert_eq!(init.next_request(true), None, "contacts wait for self info");
        init.mark_done(steps::KNOW_SELF);
        assert_eq!(init.next_request(true), Some(InitStep::ContactList));
        assert_eq!(init.next_request(true), Some(InitStep::ChatInfo));
        assert_eq!(init.next_request(true), None, "updates wait for the contact list");
        init.mark_done(steps::CONTACT_LIST);
        assert_eq!(init.next_request(true), Some(InitStep::Updates));
        assert_eq!(init.next_request(true), None);

        init.mark_done(steps::CHAT_INFO);
        init.mark_done(steps::UPDATES);
        assert!(init.is_done());
    }

    #[test]
    fn mark_done_reports_new_bits_only() {
        let mut init = InitProgress::default();
        assert!(init.mark_done(steps::SIGN_IN));
        assert!(!init.mark_done(steps::SIGN_IN));
    }

    fn new_message_update(pts: u32, pts_count: u32, unread: bool) -> enums::Update {
        enums::Update::NewMessage(types::UpdateNewMessage {
            message: enums::Message::Message(types::Message {
                unread,
                out: false,
                id: 1,
                from_id: 2,
                to_id: enums::Peer::User(types::PeerUser { user_id: 3 }),
                fwd_from_id: None,
                fwd_date: None,
                reply_to_msg_id: None,
                date: 0,
                message: "hello".into(),
                media: None,
            }),
            pts,
            pts_count,
        })
    }

    #[tokio::test]
    async fn in_order_update_advances_state_and_surfaces_message() {
        let (dispatcher, mut events) = Dispatcher::build(Config::default());
        dispatcher.inner.update_state.lock().unwrap().set(100, 0, 0);

        dispatcher.process_update(new_message_update(101, 1, true)).await;

        assert_eq!(dispatcher.inner.update_state.lock().unwrap().pts, 101);
        match events.next().await {
            Some(Event::NewMessage { public_flags, .. }) => {
                assert_eq!(
                    public_flags & updates::message_flags::READ,
                    0,
                    "wire unread must surface as READ absent"
                );
            }
            other => panic!("expected NewMessage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn gapped_update_locks_state_until_recovery_resolves() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());
        dispatcher.inner.update_state.lock().unwrap().set(100, 0, 0);

        // pts 103 with count 1 leaves 101..=102 missing.
        dispatcher.process_update(new_message_update(103, 1, false)).await;

        assert!(dispatcher.inner.update_state.lock().unwrap().is_locked());
        assert_eq!(
            dispatcher.inner.update_state.lock().unwrap().pts,
            100,
            "gapped update must not advance the state"
        );

        // Further updates are dropped while the recovery owns the state.
        dispatcher.process_update(new_message_update(104, 1, false)).await;
        assert_eq!(dispatcher.inner.update_state.lock().unwrap().pts, 100);

        // With no connection the scheduled difference fails and releases
        // the lock rather than wedging the stream.
        sleep(Duration::from_millis(50)).await;
        assert!(!dispatcher.inner.update_state.lock().unwrap().is_locked());
    }

    #[tokio::test]
    async fn stale_update_takes_the_recovery_path_too() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());
        dispatcher.inner.update_state.lock().unwrap().set(100, 0, 0);

        // pts behind the local state is a mismatch like any other: no
        // advance, and the difference fetch owns the state.
        dispatcher.process_update(new_message_update(99, 1, false)).await;
        assert_eq!(dispatcher.inner.update_state.lock().unwrap().pts, 100);
        assert!(dispatcher.inner.update_state.lock().unwrap().is_locked());
    }

    #[tokio::test]
    async fn combined_updates_are_rejected_with_resync() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());
        dispatcher
            .process_updates(enums::Updates::Combined(types::UpdatesCombined {
                updates: vec![],
                users: vec![],
                chats: vec![],
                date: 0,
                seq_start: 10,
                seq: 12,
            }))
            .await;
        assert!(
            dispatcher.inner.update_state.lock().unwrap().is_locked(),
            "combined payloads must trigger a resync instead of being applied"
        );
    }

    #[tokio::test]
    async fn short_message_is_expanded_before_reconciliation() {
        let (dispatcher, mut events) = Dispatcher::build(Config::default());
        *dispatcher.inner.self_user_id.lock().unwrap() = 900;
        dispatcher.inner.update_state.lock().unwrap().set(10, 0, 0);

        dispatcher
            .process_updates(enums::Updates::ShortMessage(types::UpdateShortMessage {
                unread: false,
                out: true,
                id: 44,
                user_id: 77,
                message: "out!".into(),
                pts: 11,
                pts_count: 1,
                date: 5,
                fwd_from_id: None,
                fwd_date: None,
                reply_to_msg_id: None,
            }))
            .await;

        assert_eq!(dispatcher.inner.update_state.lock().unwrap().pts, 11);
        match events.next().await {
            Some(Event::NewMessage { message, .. }) => {
                assert_eq!(message.from_id, 900, "outgoing short message comes from us");
                assert_eq!(
                    message.to_id,
                    enums::Peer::User(types::PeerUser { user_id: 77 })
                );
            }
            other => panic!("expected NewMessage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_job_before_sign_in_is_queued_not_dropped() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());

        let job_id = dispatcher.upload_file(vec![0u8; 512], "queued.bin").await;

        assert!(
            dispatcher.inner.jobs.lock().unwrap().contains_key(&job_id),
            "an unauthenticated job must be kept, not dropped"
        );
        assert_eq!(*dispatcher.inner.queued_jobs.lock().unwrap(), vec![job_id]);

        // Completing the sign-in step releases the job immediately; the
        // init sequence itself fails here (no connection), which must not
        // keep the queue parked.
        let _ = dispatcher.continue_initialization(steps::SIGN_IN).await;
        assert!(
            dispatcher.inner.queued_jobs.lock().unwrap().is_empty(),
            "queued jobs must start once the session is signed in"
        );
    }

    #[tokio::test]
    async fn file_job_after_sign_in_starts_straight_away() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());
        dispatcher.inner.init.lock().unwrap().mark_done(steps::SIGN_IN);

        let job_id = dispatcher.upload_file(vec![0u8; 512], "direct.bin").await;
        assert!(dispatcher.inner.queued_jobs.lock().unwrap().is_empty());
        let _ = job_id;
    }

    #[tokio::test]
    async fn dc_option_update_merges_by_id() {
        let (dispatcher, _events) = Dispatcher::build(Config::default());
        dispatcher.inner.update_state.lock().unwrap().set(10, 0, 0);

        dispatcher
            .process_update(enums::Update::DcOptions(types::UpdateDcOptions {
                dc_options: vec![
                    enums::DcOption::DcOption(types::DcOption {
                        id: 2,
                        hostname: String::new(),
                        ip_address: "10.0.0.2".into(),
                        port: 8443,
                    }),
                    enums::DcOption::DcOption(types::DcOption {
                        id: 9,
                        hostname: String::new(),
                        ip_address: "10.0.0.9".into(),
                        port: 443,
                    }),
                ],
            }))
            .await;

        let table = dispatcher.inner.dc_options.lock().unwrap();
        assert_eq!(table.len(), 6, "one replaced, one inserted");
        let dc2 = table.iter().find(|a| a.id == 2).unwrap();
        assert_eq!((dc2.host.as_str(), dc2.port), ("10.0.0.2", 8443));
        assert!(table.iter().any(|a| a.id == 9));
    }
}
