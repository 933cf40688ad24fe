use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::screening::jd::JdSummary;

/// A summarized JD as held by the registry.
#[derive(Debug, Clone, Serialize)]
pub struct StoredJd {
    pub jd_id: i64,
    pub summary: JdSummary,
    pub created_at: DateTime<Utc>,
}

/// In-memory JD store. Identifiers start at 1 and are never reused within a process.
#[derive(Clone)]
pub struct JdRegistry {
    entries: Arc<RwLock<HashMap<i64, StoredJd>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for JdRegistry {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl JdRegistry {
    pub async fn insert(&self, summary: JdSummary) -> i64 {
        let jd_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = StoredJd {
            jd_id,
            summary,
            created_at: Utc::now(),
        };
        self.entries.write().await.insert(jd_id, stored);
        jd_id
    }

    pub async fn get(&self, jd_id: i64) -> Option<StoredJd> {
        self.entries.read().await.get(&jd_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::jd::{JdTone, RoleSignals};

    fn summary(seniority: &str) -> JdSummary {
        JdSummary {
            hard_requirements: vec![],
            soft_signals: vec![],
            role_signals: RoleSignals {
                is_startup: false,
                is_ic_focused: true,
                is_research: false,
                seniority: seniority.to_string(),
            },
            keyword_inventory: vec![],
            detected_tone: JdTone::CollaborativeEnterprise,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let registry = JdRegistry::default();
        assert_eq!(registry.insert(summary("junior")).await, 1);
        assert_eq!(registry.insert(summary("senior")).await, 2);
    }

    #[tokio::test]
    async fn test_get_returns_stored_summary() {
        let registry = JdRegistry::default();
        let id = registry.insert(summary("staff")).await;
        let stored = registry.get(id).await.unwrap();
        assert_eq!(stored.jd_id, id);
        assert_eq!(stored.summary.role_signals.seniority, "staff");
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let registry = JdRegistry::default();
        assert!(registry.get(42).await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let registry = JdRegistry::default();
        let handle = registry.clone();
        let id = handle.insert(summary("mid")).await;
        assert!(registry.get(id).await.is_some());
    }
}
