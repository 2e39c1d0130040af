use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow};

use crate::model::{ClientConfig, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Where the access/refresh pair lives between requests.
///
/// Nothing here tracks expiry; a token is only found to be stale when the
/// backend rejects it.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;
    fn set(&self, access: &str, refresh: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<SessionState>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            tokens: Mutex::new(SessionState {
                version: 1,
                access_token: Some(access.to_string()),
                refresh_token: Some(refresh.to_string()),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SessionState>> {
        self.tokens
            .lock()
            .map_err(|_| anyhow!("token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let st = self.lock()?;
        Ok(token_of(&st, kind))
    }

    fn set(&self, access: &str, refresh: &str) -> Result<()> {
        let mut st = self.lock()?;
        st.access_token = Some(access.to_string());
        st.refresh_token = Some(refresh.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut st = self.lock()?;
        st.access_token = None;
        st.refresh_token = None;
        Ok(())
    }
}

fn token_of(st: &SessionState, kind: TokenKind) -> Option<String> {
    match kind {
        TokenKind::Access => st.access_token.clone(),
        TokenKind::Refresh => st.refresh_token.clone(),
    }
}

/// On-disk client state: `config.json` (endpoint settings) and `state.json`
/// (the token pair).
#[derive(Clone, Debug)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// `<platform config dir>/checklist`, e.g. `~/.config/checklist`.
    pub fn default_root() -> Result<PathBuf> {
        let base = dirs::config_dir().context("cannot determine the user config directory")?;
        Ok(base.join("checklist"))
    }

    pub fn open(root: &Path) -> Result<Self> {
        if !root.join("config.json").is_file() {
            return Err(anyhow!(
                "no checklist state found at {} (run `checklist config show` to create it)",
                root.display()
            ));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn init(root: &Path, force: bool) -> Result<Self> {
        if root.join("config.json").exists() && !force {
            return Err(anyhow!(
                "checklist state already exists at {} (use force to re-init)",
                root.display()
            ));
        }
        fs::create_dir_all(root)
            .with_context(|| format!("create state dir {}", root.display()))?;

        let dir = Self {
            root: root.to_path_buf(),
        };
        dir.write_config(&ClientConfig::default())?;
        dir.write_state(&SessionState::default())?;
        Ok(dir)
    }

    pub fn open_or_init(root: &Path) -> Result<Self> {
        if root.join("config.json").is_file() {
            Self::open(root)
        } else {
            Self::init(root, false)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let bytes = fs::read(self.root.join("config.json")).context("read config.json")?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    pub fn read_state(&self) -> Result<SessionState> {
        let path = self.root.join("state.json");
        if !path.exists() {
            return Ok(SessionState::default());
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: SessionState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported session state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &SessionState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }
}

impl TokenStore for StateDir {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let st = self.read_state()?;
        Ok(token_of(&st, kind))
    }

    fn set(&self, access: &str, refresh: &str) -> Result<()> {
        let mut st = self.read_state()?;
        st.access_token = Some(access.to_string());
        st.refresh_token = Some(refresh.to_string());
        self.write_state(&st)
    }

    fn clear(&self) -> Result<()> {
        let mut st = self.read_state()?;
        st.access_token = None;
        st.refresh_token = None;
        self.write_state(&st)
    }
}

/// Keeps temp names distinct between concurrent writers in one process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("tmp.{}.{}", std::process::id(), seq));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
