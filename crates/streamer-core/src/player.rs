//! External player process controller.
//!
//! The player (VLC) is driven purely by its command line: switching streams
//! kills the running process and launches a new one pointed at the new
//! address.  There is no feedback channel, so "playing" only ever means
//! "a process was launched".
//!
//! ```text
//!   Idle ──start(addr)──▶ Running(addr)
//!   Running ──start(addr')──▶ Running(addr')   kill, wait, spawn
//!   Running ──stop──▶ Idle
//!   Idle ──stop──▶ Idle
//! ```
use std::path::PathBuf;
use std::process::Stdio;

use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::platform::Platform;

/// Flags asking VLC for its remote-control interface and a quiet start.
const UNIX_FLAGS: &[&str] = &["-Irc", "--quiet"];
/// Remote-control flag, passed after the address on Windows.
const WINDOWS_FLAGS: &[&str] = &["-Irc"];

/// Program plus argument vector. Launched directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    /// Build the platform's command line for playing `address`.
    pub fn for_platform(platform: Platform, config: &PlayerConfig, address: &str) -> Self {
        match platform {
            Platform::Unix => Self {
                program: PathBuf::from(&config.command),
                args: UNIX_FLAGS
                    .iter()
                    .map(|s| s.to_string())
                    .chain(std::iter::once(address.to_string()))
                    .collect(),
            },
            Platform::Windows => Self {
                program: config.windows_path.clone(),
                args: std::iter::once(address.to_string())
                    .chain(WINDOWS_FLAGS.iter().map(|s| s.to_string()))
                    .collect(),
            },
        }
    }
}

// ── launching ─────────────────────────────────────────────────────────────────

/// A launched player process.
#[allow(async_fn_in_trait)]
pub trait PlayerChild {
    /// Forcibly terminate the process and wait until it has exited.
    async fn kill(&mut self) -> std::io::Result<()>;

    fn id(&self) -> Option<u32>;
}

/// Starts player processes. Split out so tests can observe spawn/kill order.
pub trait Launcher {
    type Child: PlayerChild;

    fn launch(&mut self, invocation: &Invocation) -> std::io::Result<Self::Child>;
}

/// Launches real OS processes via `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    type Child = tokio::process::Child;

    fn launch(&mut self, invocation: &Invocation) -> std::io::Result<Self::Child> {
        // stdio is piped and held by the Child but never read.
        tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}

impl PlayerChild for tokio::process::Child {
    async fn kill(&mut self) -> std::io::Result<()> {
        tokio::process::Child::kill(self).await
    }

    fn id(&self) -> Option<u32> {
        tokio::process::Child::id(self)
    }
}

// ── controller ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// No child process.
    Idle,
    /// One child process, bound to one address.
    Running { address: String },
}

/// Owns at most one external player process.
pub struct PlayerController<L: Launcher = ProcessLauncher> {
    platform: Platform,
    config: PlayerConfig,
    launcher: L,
    target: Option<String>,
    process: Option<L::Child>,
}

impl PlayerController<ProcessLauncher> {
    pub fn new(platform: Platform, config: PlayerConfig) -> Self {
        Self::with_launcher(platform, config, ProcessLauncher)
    }
}

impl<L: Launcher> PlayerController<L> {
    pub fn with_launcher(platform: Platform, config: PlayerConfig, launcher: L) -> Self {
        debug!("player initialising for {}", platform);
        Self {
            platform,
            config,
            launcher,
            target: None,
            process: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Address of the last (re)start request, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// True iff a launched process is recorded. Says nothing about audio.
    pub fn is_playing(&self) -> bool {
        self.process.is_some()
    }

    pub fn state(&self) -> PlayerState {
        match (&self.process, &self.target) {
            (Some(_), Some(address)) => PlayerState::Running {
                address: address.clone(),
            },
            _ => PlayerState::Idle,
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Kill any running player, then launch one for `address`.
    /// An empty address leaves the controller idle.
    pub async fn start(&mut self, address: &str) -> Result<(), PlayerError> {
        self.stop().await?;
        if address.is_empty() {
            debug!("player: empty address, staying idle");
            return Ok(());
        }

        let invocation = Invocation::for_platform(self.platform, &self.config, address);
        let child = self
            .launcher
            .launch(&invocation)
            .map_err(|source| PlayerError::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;
        info!(
            "player (re)started: pid={:?} address={}",
            child.id(),
            address
        );
        self.target = Some(address.to_string());
        self.process = Some(child);
        Ok(())
    }

    /// Point the player at a new address. Always restarts the process.
    pub async fn change(&mut self, address: &str) -> Result<(), PlayerError> {
        self.target = Some(address.to_string());
        self.start(address).await
    }

    /// Kill the running player and wait for it to exit. No-op when idle.
    pub async fn stop(&mut self) -> Result<(), PlayerError> {
        let Some(mut child) = self.process.take() else {
            return Ok(());
        };
        debug!("player shutting down pid={:?}", child.id());
        match self.config.stop_timeout() {
            None => child.kill().await.map_err(PlayerError::Kill),
            Some(limit) => match tokio::time::timeout(limit, child.kill()).await {
                Ok(result) => result.map_err(PlayerError::Kill),
                Err(_) => {
                    warn!("player did not exit within {:?}", limit);
                    Err(PlayerError::ShutdownTimeout(limit))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const KILL_BOUND: Duration = Duration::from_secs(5);

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Spawn(u32, Vec<String>),
        Kill(u32),
    }

    /// Records spawns and kills and tracks which fake processes are alive.
    #[derive(Default, Clone)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
        live: Arc<Mutex<Vec<u32>>>,
        next_pid: Arc<Mutex<u32>>,
        fail_spawn: bool,
    }

    struct FakeChild {
        pid: u32,
        recorder: Recorder,
    }

    impl PlayerChild for FakeChild {
        async fn kill(&mut self) -> std::io::Result<()> {
            self.recorder.calls.lock().unwrap().push(Call::Kill(self.pid));
            self.recorder.live.lock().unwrap().retain(|p| *p != self.pid);
            Ok(())
        }

        fn id(&self) -> Option<u32> {
            Some(self.pid)
        }
    }

    impl Launcher for Recorder {
        type Child = FakeChild;

        fn launch(&mut self, invocation: &Invocation) -> std::io::Result<FakeChild> {
            if self.fail_spawn {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no vlc"));
            }
            let pid = {
                let mut next = self.next_pid.lock().unwrap();
                *next += 1;
                *next
            };
            let mut live = self.live.lock().unwrap();
            assert!(live.is_empty(), "spawned while {:?} still alive", live);
            live.push(pid);
            self.calls
                .lock()
                .unwrap()
                .push(Call::Spawn(pid, invocation.args.clone()));
            Ok(FakeChild {
                pid,
                recorder: self.clone(),
            })
        }
    }

    fn controller() -> PlayerController<Recorder> {
        PlayerController::with_launcher(Platform::Unix, PlayerConfig::default(), Recorder::default())
    }

    #[test]
    fn test_unix_invocation() {
        let inv = Invocation::for_platform(Platform::Unix, &PlayerConfig::default(), "a.b/c");
        assert_eq!(inv.program, PathBuf::from("cvlc"));
        assert_eq!(inv.args, vec!["-Irc", "--quiet", "a.b/c"]);
    }

    #[test]
    fn test_windows_invocation() {
        let inv = Invocation::for_platform(Platform::Windows, &PlayerConfig::default(), "a.b/c");
        assert!(inv.program.ends_with("vlc.exe"));
        assert_eq!(inv.args, vec!["a.b/c", "-Irc"]);
    }

    #[test]
    fn test_address_is_one_argument() {
        let addr = "host/x y;rm -rf $HOME&z=1";
        let inv = Invocation::for_platform(Platform::Unix, &PlayerConfig::default(), addr);
        assert_eq!(inv.args.last().map(String::as_str), Some(addr));
    }

    #[tokio::test]
    async fn test_kill_before_spawn() {
        let mut player = controller();
        player.start("one.example/a").await.unwrap();
        player.change("two.example/b").await.unwrap();
        player.start("three.example/c").await.unwrap();

        let calls = player.launcher().calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                Call::Spawn(1, vec!["-Irc".into(), "--quiet".into(), "one.example/a".into()]),
                Call::Kill(1),
                Call::Spawn(2, vec!["-Irc".into(), "--quiet".into(), "two.example/b".into()]),
                Call::Kill(2),
                Call::Spawn(3, vec!["-Irc".into(), "--quiet".into(), "three.example/c".into()]),
            ]
        );
        assert_eq!(player.launcher().live.lock().unwrap().len(), 1);
        assert_eq!(
            player.state(),
            PlayerState::Running {
                address: "three.example/c".into()
            }
        );
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut player = controller();
        player.start("one.example/a").await.unwrap();
        player.stop().await.unwrap();
        assert_eq!(player.state(), PlayerState::Idle);
        player.stop().await.unwrap();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(!player.is_playing());

        let kills = player
            .launcher()
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::Kill(_)))
            .count();
        assert_eq!(kills, 1);
    }

    #[tokio::test]
    async fn test_empty_address_spawns_nothing() {
        let mut player = controller();
        player.start("").await.unwrap();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.launcher().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_address_stops_running_player() {
        let mut player = controller();
        player.start("one.example/a").await.unwrap();
        player.change("").await.unwrap();
        assert!(!player.is_playing());
        assert!(player.launcher().live.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure_leaves_idle() {
        let mut player = PlayerController::with_launcher(
            Platform::Unix,
            PlayerConfig::default(),
            Recorder {
                fail_spawn: true,
                ..Recorder::default()
            },
        );
        let err = player.start("one.example/a").await.unwrap_err();
        assert!(matches!(err, PlayerError::Spawn { ref program, .. } if program == "cvlc"));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[tokio::test]
    async fn test_is_playing_tracks_launch() {
        let mut player = controller();
        assert!(!player.is_playing());
        player.change("one.example/a").await.unwrap();
        assert!(player.is_playing());
        assert_eq!(player.target(), Some("one.example/a"));
    }

    /// A child whose kill never completes.
    struct StuckChild;

    impl PlayerChild for StuckChild {
        async fn kill(&mut self) -> std::io::Result<()> {
            std::future::pending().await
        }

        fn id(&self) -> Option<u32> {
            Some(99)
        }
    }

    #[derive(Default)]
    struct StuckLauncher {
        spawned: Vec<String>,
    }

    impl Launcher for StuckLauncher {
        type Child = StuckChild;

        fn launch(&mut self, invocation: &Invocation) -> std::io::Result<StuckChild> {
            self.spawned.extend(invocation.args.last().cloned());
            Ok(StuckChild)
        }
    }

    #[tokio::test]
    async fn test_stop_wait_is_bounded() {
        let config = PlayerConfig {
            stop_timeout_secs: Some(1),
            ..PlayerConfig::default()
        };
        let mut player =
            PlayerController::with_launcher(Platform::Unix, config, StuckLauncher::default());
        player.start("one.example/a").await.unwrap();

        let err = tokio::time::timeout(KILL_BOUND, player.change("two.example/b"))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, PlayerError::ShutdownTimeout(d) if d == Duration::from_secs(1)));
        assert!(!player.is_playing());
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.launcher().spawned, vec!["one.example/a".to_string()]);

        // Nothing left to wait on.
        player.stop().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_process_is_killed() {
        let mut launcher = ProcessLauncher;
        let mut child = launcher
            .launch(&Invocation {
                program: PathBuf::from("sleep"),
                args: vec!["30".into()],
            })
            .unwrap();
        assert!(PlayerChild::id(&child).is_some());
        tokio::time::timeout(KILL_BOUND, PlayerChild::kill(&mut child))
            .await
            .unwrap()
            .unwrap();
        assert!(child.try_wait().unwrap().is_some());
    }
}
