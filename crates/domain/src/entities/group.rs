//! 群组实体定义
//!
//! 创建者始终是群组成员。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 群组实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// 群组唯一ID
    pub id: Uuid,
    /// 群组名称
    pub name: String,
    /// 创建者ID
    pub creator_id: Uuid,
    /// 成员集合，始终包含创建者
    pub members: Vec<Uuid>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// 创建新群组，创建者自动加入成员列表
    pub fn new(
        name: impl Into<String>,
        creator_id: Uuid,
        member_ids: Vec<Uuid>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name", "群组名称不能为空"));
        }

        let mut members = vec![creator_id];
        for member_id in member_ids {
            if !members.contains(&member_id) {
                members.push(member_id);
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            creator_id,
            members,
            created_at: Utc::now(),
        })
    }

    /// 检查用户是否为群组成员
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}
