//! Client for the Unbound remote control interface

use std::{path::PathBuf, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    Result,
    command::{self, CommandLine, Flags, ValidOption},
    config::{ClientConfig, Target, Timeouts, TlsConfig},
    parser,
    response::{Response, ResponseData},
    session::Session,
    transport::{Connector, TargetConnector},
};

/// Client for administering a running Unbound daemon.
///
/// Every command is a fresh exchange: the daemon closes the connection after
/// each reply, so the next command reconnects. Commands issued concurrently
/// on one client are queued and never share a socket.
///
/// ```no_run
/// # async fn run() -> unbound_control::Result<()> {
/// use unbound_control::UnboundControlClient;
///
/// let client = UnboundControlClient::unix("/run/unbound.ctl");
/// let status = client.status().await?;
/// println!("{:?}", status.status().and_then(|s| s.version.as_deref()));
/// # Ok(())
/// # }
/// ```
pub struct UnboundControlClient {
    connector: Arc<dyn Connector>,
    session: Session,
}

impl UnboundControlClient {
    /// Create a client for a Unix domain control socket
    #[must_use]
    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Self::new(ClientConfig::new(Target::unix(path)))
    }

    /// Create a client for the TLS control port
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16, tls: TlsConfig) -> Self {
        Self::new(ClientConfig::new(Target::tcp(host, port, tls)))
    }

    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        debug!("Control target: {}", config.target);
        Self::with_connector(Arc::new(TargetConnector::new(config.target)), config.timeouts)
    }

    /// Create a client that opens connections through `connector`.
    #[must_use]
    pub fn with_connector(connector: Arc<dyn Connector>, timeouts: Timeouts) -> Self {
        let session = Session::new(Arc::clone(&connector), timeouts);
        Self { connector, session }
    }

    /// Replace the connect and response deadlines.
    ///
    /// Any connection held by the current session is dropped.
    #[must_use]
    pub fn with_timeouts(self, timeouts: Timeouts) -> Self {
        Self::with_connector(self.connector, timeouts)
    }

    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        self.session.timeouts()
    }

    /// Connect now instead of lazily on the first command.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connection`](crate::ControlError::Connection)
    /// or [`ControlError::Timeout`](crate::ControlError::Timeout) if the
    /// daemon cannot be reached.
    pub async fn connect(&self) -> Result<()> {
        self.session.connect().await
    }

    /// Close the connection. A command waiting for its reply fails instead of
    /// hanging.
    pub async fn disconnect(&self) {
        self.session.disconnect().await;
    }

    // Lifecycle

    /// Start the server.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn start(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("start")).await
    }

    /// Stop the server. The daemon exits.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn stop(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("stop")).await
    }

    /// Flush the cache and re-read the configuration file.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn reload(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("reload")).await
    }

    /// Reload, keeping the RRset and message caches if the new configuration
    /// allows it.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn reload_keep_cache(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("reload_keep_cache")).await
    }

    // Logging

    /// Change the logging verbosity.
    ///
    /// Levels run from 0 (errors only) to 5 (client identification for cache
    /// misses).
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Parse`](crate::ControlError::Parse) without
    /// contacting the daemon if `level` is above 5, and when the daemon
    /// rejects the level or answers with anything but `ok`.
    pub async fn verbosity(&self, level: u8) -> Result<Response> {
        command::check_verbosity(level)?;
        let raw = self.send(CommandLine::new("verbosity").arg(level.to_string())).await?;
        let data = parser::parse_verbosity(&raw, level)?;
        Ok(Response::new(raw, data))
    }

    /// Close and reopen the log file.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn log_reopen(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("log_reopen")).await
    }

    // Statistics

    /// Print statistics and reset the counters.
    ///
    /// # Errors
    ///
    /// Fails like [`UnboundControlClient::status`], and with
    /// [`ControlError::Parse`](crate::ControlError::Parse) if a line is not
    /// `key=value`.
    pub async fn stats(&self) -> Result<Response> {
        self.statistics("stats").await
    }

    /// Print statistics without resetting the counters.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::stats`].
    pub async fn stats_noreset(&self) -> Result<Response> {
        self.statistics("stats_noreset").await
    }

    /// Display server status.
    ///
    /// # Errors
    ///
    /// - [`ControlError::Connection`](crate::ControlError::Connection) if the
    ///   daemon cannot be reached
    /// - [`ControlError::Command`](crate::ControlError::Command) if the
    ///   exchange fails midway
    /// - [`ControlError::Timeout`](crate::ControlError::Timeout) if a
    ///   configured deadline expires
    /// - [`ControlError::UnsupportedCommand`](crate::ControlError::UnsupportedCommand)
    ///   if the daemon does not know the command
    /// - [`ControlError::Parse`](crate::ControlError::Parse) if a numeric
    ///   field is malformed, or before sending if an argument is blank or
    ///   contains a line break
    pub async fn status(&self) -> Result<Response> {
        let raw = self.send(CommandLine::new("status")).await?;
        let status = parser::parse_status(&raw)?;
        Ok(Response::new(raw, ResponseData::Status(status)))
    }

    // Cache

    /// Remove `name` from the cache, and from `cachedb` too if asked.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush(&self, name: &str, cachedb: bool) -> Result<Response> {
        let command = CommandLine::new("flush").flags(cachedb_flag(cachedb)).arg(name);
        self.acknowledged(command).await
    }

    /// Remove `name` with the given record type from the cache.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_type(&self, name: &str, rr_type: &str, cachedb: bool) -> Result<Response> {
        let command = CommandLine::new("flush_type")
            .flags(cachedb_flag(cachedb))
            .arg(name)
            .arg(rr_type);
        self.acknowledged(command).await
    }

    /// Remove everything at or below `name` from the cache.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_zone(&self, name: &str, cachedb: bool) -> Result<Response> {
        let command = CommandLine::new("flush_zone")
            .flags(cachedb_flag(cachedb))
            .arg(name);
        self.acknowledged(command).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_bogus(&self, cachedb: bool) -> Result<Response> {
        self.acknowledged(CommandLine::new("flush_bogus").flags(cachedb_flag(cachedb)))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_negative(&self, cachedb: bool) -> Result<Response> {
        self.acknowledged(CommandLine::new("flush_negative").flags(cachedb_flag(cachedb)))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_stats(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("flush_stats")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn flush_requestlist(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("flush_requestlist")).await
    }

    /// Drop infrastructure cache entries for `address`, or for every host
    /// with `all`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Parse`](crate::ControlError::Parse) before
    /// sending if `address` is not `all`, `off` or a dotted quad.
    pub async fn flush_infra(&self, address: &str) -> Result<Response> {
        command::check_valid_ip(address)?;
        self.acknowledged(CommandLine::new("flush_infra").arg(address)).await
    }

    /// The message and RRset cache in text form, suitable for
    /// [`UnboundControlClient::load_cache`].
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn dump_cache(&self) -> Result<Response> {
        self.text(CommandLine::new("dump_cache")).await
    }

    /// Load a cache dump produced by [`UnboundControlClient::dump_cache`].
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn load_cache<S: AsRef<str>>(&self, dump: &[S]) -> Result<Response> {
        self.bulk(CommandLine::new("load_cache"), dump).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn dump_requestlist(&self) -> Result<Response> {
        self.listed(CommandLine::new("dump_requestlist")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn dump_infra(&self) -> Result<Response> {
        self.listed(CommandLine::new("dump_infra")).await
    }

    /// Show which servers would be queried for `name`.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn lookup(&self, name: &str) -> Result<Response> {
        self.text(CommandLine::new("lookup").arg(name)).await
    }

    // Options

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn get_option(&self, option: ValidOption) -> Result<Response> {
        self.listed(CommandLine::new("get_option").arg(option.as_str()))
            .await
    }

    /// Set `option` without a reload.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn set_option(&self, option: ValidOption, value: &str) -> Result<Response> {
        let command = CommandLine::new("set_option")
            .arg(format!("{option}:"))
            .arg(value);
        self.acknowledged(command).await
    }

    // Forward and stub zones

    /// Switch to forwarding mode, sending all queries to `addresses`.
    ///
    /// `off` as the only address turns forwarding mode off.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Parse`](crate::ControlError::Parse) before
    /// sending if the list is empty or an address is invalid.
    pub async fn forward<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Response> {
        command::check_addresses(addresses)?;
        self.acknowledged(CommandLine::new("forward").args(addresses))
            .await
    }

    /// The forwarders currently in use by forwarding mode.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn current_forward(&self) -> Result<Response> {
        self.listed(CommandLine::new("forward")).await
    }

    /// Add a forward zone.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Parse`](crate::ControlError::Parse) before
    /// sending if the list is empty or an address is invalid.
    pub async fn forward_add<S: AsRef<str>>(
        &self,
        zone: &str,
        addresses: &[S],
        insecure: bool,
        tls: bool,
    ) -> Result<Response> {
        command::check_addresses(addresses)?;
        let flags = Flags {
            insecure,
            tls,
            ..Flags::default()
        };
        let command = CommandLine::new("forward_add")
            .flags(flags)
            .arg(zone)
            .args(addresses);
        self.acknowledged(command).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn forward_remove(&self, zone: &str, insecure: bool) -> Result<Response> {
        let command = CommandLine::new("forward_remove")
            .flags(insecure_flag(insecure))
            .arg(zone);
        self.acknowledged(command).await
    }

    /// Add a stub zone.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Parse`](crate::ControlError::Parse) before
    /// sending if the list is empty or an address is invalid.
    pub async fn stub_add<S: AsRef<str>>(
        &self,
        zone: &str,
        addresses: &[S],
        insecure: bool,
        prime: bool,
        tls: bool,
    ) -> Result<Response> {
        command::check_addresses(addresses)?;
        let flags = Flags {
            insecure,
            prime,
            tls,
            ..Flags::default()
        };
        let command = CommandLine::new("stub_add")
            .flags(flags)
            .arg(zone)
            .args(addresses);
        self.acknowledged(command).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn stub_remove(&self, zone: &str, insecure: bool) -> Result<Response> {
        let command = CommandLine::new("stub_remove")
            .flags(insecure_flag(insecure))
            .arg(zone);
        self.acknowledged(command).await
    }

    /// Mark `zone` as domain-insecure.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn insecure_add(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("insecure_add").arg(zone)).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn insecure_remove(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("insecure_remove").arg(zone)).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_stubs(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_stubs")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_forwards(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_forwards")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_insecure(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_insecure")).await
    }

    // Authority zones and RPZ

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_auth_zones(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_auth_zones")).await
    }

    /// Reload an authority zone from its zonefile.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn auth_zone_reload(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("auth_zone_reload").arg(zone))
            .await
    }

    /// Transfer an authority zone from its primary.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn auth_zone_transfer(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("auth_zone_transfer").arg(zone))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn rpz_enable(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("rpz_enable").arg(zone)).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn rpz_disable(&self, zone: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("rpz_disable").arg(zone)).await
    }

    // Local zones and data

    /// Add a local zone of the given type, e.g. `static` or `redirect`.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_zone(&self, name: &str, zone_type: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("local_zone").arg(name).arg(zone_type))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_zone_remove(&self, name: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("local_zone_remove").arg(name))
            .await
    }

    /// Add local data given as a resource record, e.g.
    /// `www.example.com. 3600 IN A 192.0.2.1`.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_data(&self, rr: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("local_data").arg(rr)).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_data_remove(&self, name: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("local_data_remove").arg(name))
            .await
    }

    /// Add many local zones at once, one `name type` entry per line.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_zones<S: AsRef<str>>(&self, zones: &[S]) -> Result<Response> {
        self.bulk(CommandLine::new("local_zones"), zones).await
    }

    /// Remove many local zones at once, one name per line.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_zones_remove<S: AsRef<str>>(&self, names: &[S]) -> Result<Response> {
        self.bulk(CommandLine::new("local_zones_remove"), names).await
    }

    /// Add many resource records at once.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_datas<S: AsRef<str>>(&self, records: &[S]) -> Result<Response> {
        self.bulk(CommandLine::new("local_datas"), records).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn local_datas_remove<S: AsRef<str>>(&self, names: &[S]) -> Result<Response> {
        self.bulk(CommandLine::new("local_datas_remove"), names).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_local_zones(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_local_zones")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn list_local_data(&self) -> Result<Response> {
        self.listed(CommandLine::new("list_local_data")).await
    }

    // Views

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_list_local_zones(&self, view: &str) -> Result<Response> {
        self.listed(CommandLine::new("view_list_local_zones").arg(view))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_zone(
        &self,
        view: &str,
        name: &str,
        zone_type: &str,
    ) -> Result<Response> {
        let command = CommandLine::new("view_local_zone")
            .arg(view)
            .arg(name)
            .arg(zone_type);
        self.acknowledged(command).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_zone_remove(&self, view: &str, name: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("view_local_zone_remove").arg(view).arg(name))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_list_local_data(&self, view: &str) -> Result<Response> {
        self.listed(CommandLine::new("view_list_local_data").arg(view))
            .await
    }

    /// Add local data to `view`; `data` holds the rest of the record after
    /// the owner name, e.g. `["3600", "IN", "A", "192.0.2.1"]`.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_data<S: AsRef<str>>(
        &self,
        view: &str,
        name: &str,
        data: &[S],
    ) -> Result<Response> {
        let command = CommandLine::new("view_local_data")
            .arg(view)
            .arg(name)
            .args(data);
        self.acknowledged(command).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_data_remove(&self, view: &str, name: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("view_local_data_remove").arg(view).arg(name))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_datas<S: AsRef<str>>(
        &self,
        view: &str,
        records: &[S],
    ) -> Result<Response> {
        self.bulk(CommandLine::new("view_local_datas").arg(view), records)
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn view_local_datas_remove<S: AsRef<str>>(
        &self,
        view: &str,
        names: &[S],
    ) -> Result<Response> {
        self.bulk(CommandLine::new("view_local_datas_remove").arg(view), names)
            .await
    }

    // DNS cookies

    /// Stage a new cookie secret.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn add_cookie_secret(&self, secret: &str) -> Result<Response> {
        self.acknowledged(CommandLine::new("add_cookie_secret").arg(secret))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn drop_cookie_secret(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("drop_cookie_secret")).await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn activate_cookie_secret(&self) -> Result<Response> {
        self.acknowledged(CommandLine::new("activate_cookie_secret"))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn print_cookie_secrets(&self) -> Result<Response> {
        self.listed(CommandLine::new("print_cookie_secrets")).await
    }

    // Rate limiting

    /// Domains currently rate limited, or every tracked domain with `all`.
    ///
    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn ratelimit_list(&self, all: bool) -> Result<Response> {
        self.listed(CommandLine::new("ratelimit_list").flags(all_flag(all)))
            .await
    }

    /// # Errors
    ///
    /// See [`UnboundControlClient::status`].
    pub async fn ip_ratelimit_list(&self, all: bool) -> Result<Response> {
        self.listed(CommandLine::new("ip_ratelimit_list").flags(all_flag(all)))
            .await
    }

    async fn statistics(&self, name: &str) -> Result<Response> {
        let raw = self.send(CommandLine::new(name)).await?;
        let record = parser::parse_stats(&raw)?;
        Ok(Response::new(raw, ResponseData::Record(record)))
    }

    async fn acknowledged(&self, command: CommandLine) -> Result<Response> {
        let raw = self.send(command).await?;
        let data = parser::parse_acknowledgement(&raw);
        Ok(Response::new(raw, data))
    }

    async fn listed(&self, command: CommandLine) -> Result<Response> {
        let raw = self.send(command).await?;
        let lines = parser::parse_lines(&raw);
        Ok(Response::new(raw, ResponseData::Lines(lines)))
    }

    async fn text(&self, command: CommandLine) -> Result<Response> {
        let raw = self.send(command).await?;
        Ok(Response::new(raw, ResponseData::Text))
    }

    async fn bulk<S: AsRef<str>>(&self, command: CommandLine, lines: &[S]) -> Result<Response> {
        let payload = lines
            .iter()
            .map(|line| -> Result<String> {
                let line = line.as_ref();
                command::check_payload_line(line)?;
                Ok(line.to_string())
            })
            .collect::<Result<Vec<_>>>()?;
        let raw = self.send_with(command, Some(payload.as_slice())).await?;
        let data = parser::parse_acknowledgement(&raw);
        Ok(Response::new(raw, data))
    }

    async fn send(&self, command: CommandLine) -> Result<String> {
        self.send_with(command, None).await
    }

    #[instrument(level = "trace", skip_all, err)]
    async fn send_with(&self, command: CommandLine, payload: Option<&[String]>) -> Result<String> {
        let line = command.build()?;
        let raw = self.session.execute(&line, payload).await?;
        parser::check_supported(&raw)?;
        Ok(raw)
    }
}

const fn cachedb_flag(cachedb: bool) -> Flags {
    Flags {
        insecure: false,
        prime: false,
        tls: false,
        cachedb,
        all: false,
    }
}

const fn insecure_flag(insecure: bool) -> Flags {
    Flags {
        insecure,
        prime: false,
        tls: false,
        cachedb: false,
        all: false,
    }
}

const fn all_flag(all: bool) -> Flags {
    Flags {
        insecure: false,
        prime: false,
        tls: false,
        cachedb: false,
        all,
    }
}
