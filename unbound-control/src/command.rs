//! Command lines and argument validation.
//!
//! Everything here runs before any I/O: a command that fails validation never
//! opens a connection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ControlError, Result};

/// Highest level accepted by `verbosity`
pub const MAX_VERBOSITY: u8 = 5;

/// Options that may be read with `get_option` or changed with `set_option`
/// on a running daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidOption {
    StatisticsInterval,
    StatisticsCumulative,
    DoNotQueryLocalhost,
    HardenShortBufsize,
    HardenLargeQueries,
    HardenGlue,
    HardenDnssecStripped,
    HardenBelowNxdomain,
    HardenReferralPath,
    Prefetch,
    PrefetchKey,
    LogQueries,
    HideIdentity,
    HideVersion,
    Identity,
    Version,
    ValLogLevel,
    ValLogSquelch,
    IgnoreCdFlag,
    AddHolddown,
    DelHolddown,
    KeepMissing,
    TcpUpstream,
    SslUpstream,
    MaxUdpSize,
    Ratelimit,
    IpRatelimit,
    CacheMaxTtl,
    CacheMinTtl,
    CacheMaxNegativeTtl,
}

impl ValidOption {
    pub const ALL: [Self; 30] = [
        Self::StatisticsInterval,
        Self::StatisticsCumulative,
        Self::DoNotQueryLocalhost,
        Self::HardenShortBufsize,
        Self::HardenLargeQueries,
        Self::HardenGlue,
        Self::HardenDnssecStripped,
        Self::HardenBelowNxdomain,
        Self::HardenReferralPath,
        Self::Prefetch,
        Self::PrefetchKey,
        Self::LogQueries,
        Self::HideIdentity,
        Self::HideVersion,
        Self::Identity,
        Self::Version,
        Self::ValLogLevel,
        Self::ValLogSquelch,
        Self::IgnoreCdFlag,
        Self::AddHolddown,
        Self::DelHolddown,
        Self::KeepMissing,
        Self::TcpUpstream,
        Self::SslUpstream,
        Self::MaxUdpSize,
        Self::Ratelimit,
        Self::IpRatelimit,
        Self::CacheMaxTtl,
        Self::CacheMinTtl,
        Self::CacheMaxNegativeTtl,
    ];

    /// Name as written in `unbound.conf`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatisticsInterval => "statistics-interval",
            Self::StatisticsCumulative => "statistics-cumulative",
            Self::DoNotQueryLocalhost => "do-not-query-localhost",
            Self::HardenShortBufsize => "harden-short-bufsize",
            Self::HardenLargeQueries => "harden-large-queries",
            Self::HardenGlue => "harden-glue",
            Self::HardenDnssecStripped => "harden-dnssec-stripped",
            Self::HardenBelowNxdomain => "harden-below-nxdomain",
            Self::HardenReferralPath => "harden-referral-path",
            Self::Prefetch => "prefetch",
            Self::PrefetchKey => "prefetch-key",
            Self::LogQueries => "log-queries",
            Self::HideIdentity => "hide-identity",
            Self::HideVersion => "hide-version",
            Self::Identity => "identity",
            Self::Version => "version",
            Self::ValLogLevel => "val-log-level",
            Self::ValLogSquelch => "val-log-squelch",
            Self::IgnoreCdFlag => "ignore-cd-flag",
            Self::AddHolddown => "add-holddown",
            Self::DelHolddown => "del-holddown",
            Self::KeepMissing => "keep-missing",
            Self::TcpUpstream => "tcp-upstream",
            Self::SslUpstream => "ssl-upstream",
            Self::MaxUdpSize => "max-udp-size",
            Self::Ratelimit => "ratelimit",
            Self::IpRatelimit => "ip-ratelimit",
            Self::CacheMaxTtl => "cache-max-ttl",
            Self::CacheMinTtl => "cache-min-ttl",
            Self::CacheMaxNegativeTtl => "cache-max-negative-ttl",
        }
    }
}

impl fmt::Display for ValidOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidOption {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| ControlError::parse(format!("Invalid option: {s}")))
    }
}

/// Accept `all`, `off`, or four dot separated groups of 1 to 3 digits.
///
/// Octet values are not range checked and IPv6 literals are rejected.
///
/// # Errors
///
/// Returns [`ControlError::Parse`] for anything else.
pub fn check_valid_ip(address: &str) -> Result<()> {
    if address == "all" || address == "off" {
        return Ok(());
    }

    let groups: Vec<&str> = address.split('.').collect();
    let valid = groups.len() == 4
        && groups.iter().all(|group| {
            (1..=3).contains(&group.len()) && group.bytes().all(|b| b.is_ascii_digit())
        });

    if valid {
        Ok(())
    } else {
        Err(ControlError::parse(format!("Invalid IP address: {address}")))
    }
}

/// Validate every entry of a forward or stub address list.
///
/// # Errors
///
/// Returns [`ControlError::Parse`] if the list is empty or any entry fails
/// [`check_valid_ip`].
pub fn check_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<()> {
    if addresses.is_empty() {
        return Err(ControlError::parse("At least one address must be provided."));
    }
    addresses
        .iter()
        .try_for_each(|address| check_valid_ip(address.as_ref()))
}

/// # Errors
///
/// Returns [`ControlError::Parse`] if `level` is above [`MAX_VERBOSITY`].
pub fn check_verbosity(level: u8) -> Result<()> {
    if level > MAX_VERBOSITY {
        return Err(ControlError::parse(format!(
            "Invalid verbosity level: {level}"
        )));
    }
    Ok(())
}

/// Optional behaviours toggled by `+` tokens before the arguments.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `i`: mark the zone domain-insecure
    pub insecure: bool,
    /// `p`: prime the stub zone
    pub prime: bool,
    /// `t`: use TLS upstream
    pub tls: bool,
    /// `c`: also flush `cachedb`
    pub cachedb: bool,
    /// `a`: list all domains, not only rate limited ones
    pub all: bool,
}

impl Flags {
    /// The set flags joined without separators, e.g. `+i+t`, or `None` when
    /// nothing is set.
    #[must_use]
    pub fn token(self) -> Option<String> {
        let token: String = [
            (self.insecure, 'i'),
            (self.prime, 'p'),
            (self.tls, 't'),
            (self.cachedb, 'c'),
            (self.all, 'a'),
        ]
        .into_iter()
        .filter_map(|(set, letter)| set.then(|| format!("+{letter}")))
        .collect();

        (!token.is_empty()).then_some(token)
    }
}

/// Characters that would break the framing if sent inside an argument
const FRAMING: [char; 3] = ['\n', '\r', '\x04'];

/// Check one line of a bulk payload.
///
/// # Errors
///
/// Returns [`ControlError::Parse`] if the line contains a line break or the
/// end-of-input marker.
pub fn check_payload_line(line: &str) -> Result<()> {
    if line.contains(FRAMING) {
        return Err(ControlError::parse(format!("Invalid payload line: {line:?}")));
    }
    Ok(())
}

/// Builder for the text after the protocol header.
///
/// The first invalid argument is kept and reported by [`CommandLine::build`],
/// so nothing is sent for a malformed command.
#[derive(Debug, Clone)]
pub(crate) struct CommandLine {
    line: String,
    invalid: Option<ControlError>,
}

impl CommandLine {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            line: name.to_string(),
            invalid: None,
        }
    }

    /// Flags are optional, nothing is written when none is set
    pub(crate) fn flags(mut self, flags: Flags) -> Self {
        if let Some(token) = flags.token() {
            self.push(&token);
        }
        self
    }

    /// Required argument; blank ones and ones containing a line break are
    /// rejected.
    pub(crate) fn arg(mut self, arg: impl AsRef<str>) -> Self {
        if self.invalid.is_some() {
            return self;
        }

        let raw = arg.as_ref();
        let arg = raw.trim();
        if arg.is_empty() {
            self.invalid = Some(ControlError::parse(format!(
                "Missing argument for {}",
                self.name()
            )));
        } else if arg.contains(FRAMING) {
            self.invalid = Some(ControlError::parse(format!(
                "Invalid argument for {}: {raw:?}",
                self.name()
            )));
        } else {
            self.push(arg);
        }
        self
    }

    pub(crate) fn args<S: AsRef<str>>(self, args: &[S]) -> Self {
        args.iter().fold(self, |line, arg| line.arg(arg))
    }

    pub(crate) fn build(self) -> Result<String> {
        match self.invalid {
            Some(err) => Err(err),
            None => Ok(self.line),
        }
    }

    fn name(&self) -> &str {
        self.line.split(' ').next().unwrap_or_default()
    }

    fn push(&mut self, token: &str) {
        self.line.push(' ');
        self.line.push_str(token);
    }
}
