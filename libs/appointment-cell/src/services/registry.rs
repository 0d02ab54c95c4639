use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::AppointmentError;
use crate::services::flow::BookingFlow;

/// Open flows kept per user. Creating one more drops that user's least
/// recently updated flow.
pub const MAX_FLOWS_PER_OWNER: usize = 5;

/// In-memory booking flows keyed by id. A flow is only visible to the user
/// who created it; anyone else gets `FlowNotFound`.
pub struct FlowRegistry {
    flows: RwLock<HashMap<Uuid, BookingFlow>>,
    max_per_owner: usize,
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::with_limit(MAX_FLOWS_PER_OWNER)
    }
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_per_owner: usize) -> Self {
        Self {
            flows: RwLock::new(HashMap::new()),
            max_per_owner: max_per_owner.max(1),
        }
    }

    pub async fn create(&self, owner_id: &str) -> BookingFlow {
        let flow = BookingFlow::new(owner_id);
        let mut flows = self.flows.write().await;

        let mut owned: Vec<(Uuid, DateTime<Utc>)> = flows
            .values()
            .filter(|existing| existing.owner_id() == owner_id)
            .map(|existing| (existing.id(), existing.updated_at()))
            .collect();
        if owned.len() >= self.max_per_owner {
            owned.sort_by_key(|(_, updated_at)| *updated_at);
            let excess = owned.len() + 1 - self.max_per_owner;
            for (stale_id, _) in owned.into_iter().take(excess) {
                flows.remove(&stale_id);
                debug!("Evicted booking flow {} for user {}", stale_id, owner_id);
            }
        }

        debug!("Created booking flow {} for user {}", flow.id(), owner_id);
        flows.insert(flow.id(), flow.clone());
        flow
    }

    pub async fn get(&self, flow_id: Uuid, owner_id: &str) -> Result<BookingFlow, AppointmentError> {
        let flows = self.flows.read().await;
        flows
            .get(&flow_id)
            .filter(|flow| flow.owner_id() == owner_id)
            .cloned()
            .ok_or(AppointmentError::FlowNotFound(flow_id))
    }

    /// Applies `apply` to the stored flow. On error the flow is restored to
    /// what it was before the call.
    pub async fn update<T, F>(&self, flow_id: Uuid, owner_id: &str, apply: F) -> Result<T, AppointmentError>
    where
        F: FnOnce(&mut BookingFlow) -> Result<T, AppointmentError>,
    {
        let mut flows = self.flows.write().await;
        let flow = flows
            .get_mut(&flow_id)
            .filter(|flow| flow.owner_id() == owner_id)
            .ok_or(AppointmentError::FlowNotFound(flow_id))?;

        let snapshot = flow.clone();
        let result = apply(flow);
        if result.is_err() {
            *flow = snapshot;
        }
        result
    }

    pub async fn remove(&self, flow_id: Uuid, owner_id: &str) -> Result<(), AppointmentError> {
        let mut flows = self.flows.write().await;
        match flows.get(&flow_id) {
            Some(flow) if flow.owner_id() == owner_id => {
                flows.remove(&flow_id);
                debug!("Removed booking flow {}", flow_id);
                Ok(())
            }
            _ => Err(AppointmentError::FlowNotFound(flow_id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.flows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flows.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStep;
    use doctor_cell::services::DoctorDirectory;

    #[tokio::test]
    async fn test_flows_are_owner_scoped() {
        let registry = FlowRegistry::new();
        let flow = registry.create("owner").await;

        assert!(registry.get(flow.id(), "owner").await.is_ok());
        assert_eq!(
            registry.get(flow.id(), "intruder").await.unwrap_err(),
            AppointmentError::FlowNotFound(flow.id())
        );
        assert!(registry.remove(flow.id(), "intruder").await.is_err());
        assert_eq!(registry.len().await, 1);

        registry.remove(flow.id(), "owner").await.unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_flow_unchanged() {
        let registry = FlowRegistry::new();
        let directory = DoctorDirectory::new();
        let flow = registry.create("owner").await;

        let result = registry
            .update(flow.id(), "owner", |flow| {
                flow.update_search(Some("dermatology".to_string()), None);
                flow.go_to(BookingStep::Select, &directory)
            })
            .await;

        assert_eq!(result, Err(AppointmentError::NoMatchingDoctors));
        let stored = registry.get(flow.id(), "owner").await.unwrap();
        let view = stored.view(&directory);
        assert!(view.specialty.is_empty());
        assert_eq!(view.step, BookingStep::Search);
    }

    #[tokio::test]
    async fn test_owner_flow_count_is_bounded() {
        let registry = FlowRegistry::with_limit(2);

        let first = registry.create("owner").await;
        let second = registry.create("owner").await;
        let other = registry.create("other").await;

        // Touching the first flow makes the second the stalest.
        registry
            .update(first.id(), "owner", |flow| {
                flow.update_search(Some("cardio".to_string()), None);
                Ok(())
            })
            .await
            .unwrap();

        let third = registry.create("owner").await;

        assert_eq!(registry.len().await, 3);
        assert!(registry.get(first.id(), "owner").await.is_ok());
        assert_eq!(
            registry.get(second.id(), "owner").await.unwrap_err(),
            AppointmentError::FlowNotFound(second.id())
        );
        assert!(registry.get(third.id(), "owner").await.is_ok());
        assert!(registry.get(other.id(), "other").await.is_ok());
    }

    #[tokio::test]
    async fn test_default_limit() {
        let registry = FlowRegistry::new();

        for _ in 0..MAX_FLOWS_PER_OWNER + 3 {
            registry.create("owner").await;
        }

        assert_eq!(registry.len().await, MAX_FLOWS_PER_OWNER);
    }
}
