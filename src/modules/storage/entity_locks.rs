use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Sharded async mutex keyed by entity id.
///
/// Two ids may share a shard, which only costs some extra serialization.
pub struct EntityLocks {
    shards: Vec<Mutex<()>>,
}

impl EntityLocks {
    pub fn new(shards: usize) -> Self {
        let shards = shards.max(1);
        Self {
            shards: (0..shards).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Wait for exclusive access to `id`
    pub async fn lock(&self, id: Uuid) -> MutexGuard<'_, ()> {
        self.shards[self.shard_index(id)].lock().await
    }

    fn shard_index(&self, id: Uuid) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }
}
