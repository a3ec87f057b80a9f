//! Azure Cache for Redis

use crate::resourceids::typed_resource_id;

pub const API_VERSION: &str = "2023-08-01";

typed_resource_id! {
    /// A Redis cache
    pub struct RedisId(
        "Redis",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Cache/redis/{redisName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        redis_name => "redisName",
    }
}
