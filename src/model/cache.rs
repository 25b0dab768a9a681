//! Recently opened events, persisted between runs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use tokio::sync::RwLock;

const RECENT_EVENTS_CACHE_FILE: &str = ".cache/recent_events.json";
pub const MAX_RECENT_EVENTS: usize = 10;

/// Most-recent-first list of event ids
#[derive(Clone)]
pub struct RecentEvents {
    events: Arc<RwLock<Vec<String>>>,
    path: PathBuf,
}

impl RecentEvents {
    pub fn new() -> Self {
        Self::with_path(RECENT_EVENTS_CACHE_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            path: path.into(),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        if self.path.exists() {
            let content = tokio::fs::read_to_string(&self.path).await?;
            let ids: Vec<String> = serde_json::from_str(&content)?;
            let mut events = self.events.write().await;
            *events = ids.into_iter().take(MAX_RECENT_EVENTS).collect();
        }
        Ok(())
    }

    pub async fn save_to_disk(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let content = serde_json::to_string(&*self.events.read().await)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Move `event_id` to the front, returning the updated list
    pub async fn push(&self, event_id: &str) -> Vec<String> {
        let mut events = self.events.write().await;
        events.retain(|e| e != event_id);
        events.insert(0, event_id.to_string());
        events.truncate(MAX_RECENT_EVENTS);
        events.clone()
    }

    pub async fn list(&self) -> Vec<String> {
        self.events.read().await.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for RecentEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("booth-gallery-test-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn push_moves_event_to_front() {
        let recent = RecentEvents::with_path(scratch_file("unused.json"));
        recent.push("a").await;
        recent.push("b").await;
        let list = recent.push("a").await;
        assert_eq!(list, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn push_caps_list_length() {
        let recent = RecentEvents::with_path(scratch_file("unused.json"));
        for i in 0..(MAX_RECENT_EVENTS + 5) {
            recent.push(&format!("event-{i}")).await;
        }
        let list = recent.list().await;
        assert_eq!(list.len(), MAX_RECENT_EVENTS);
        assert_eq!(list[0], format!("event-{}", MAX_RECENT_EVENTS + 4));
    }

    #[tokio::test]
    async fn survives_save_and_load() {
        let path = scratch_file("recent_events.json");
        let recent = RecentEvents::with_path(&path);
        recent.push("wedding").await;
        recent.push("gala").await;
        recent.save_to_disk().await.unwrap();

        let reloaded = RecentEvents::with_path(&path);
        reloaded.load_from_disk().await.unwrap();
        assert_eq!(reloaded.list().await, vec!["gala".to_string(), "wedding".to_string()]);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let recent = RecentEvents::with_path(scratch_file("does-not-exist.json"));
        recent.load_from_disk().await.unwrap();
        assert!(recent.list().await.is_empty());
    }
}
