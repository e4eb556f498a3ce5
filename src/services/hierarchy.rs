//! Hierarchy aggregation service
//!
//! Turns the flat (client, equipment, activity) row set into the nested
//! report: clients in first-seen order, each holding activity buckets with
//! de-duplicated equipment. The fold is pure; the service only loads rows
//! and applies it.

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::AppResult,
    models::enums::ActivityState,
    models::hierarchy::{
        HierarchyClient, HierarchyEquipment, HierarchyGroup, HierarchyReport, HierarchyRow,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct HierarchyService {
    repository: Repository,
}

impl HierarchyService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Build the full hierarchy report
    pub async fn report(&self) -> AppResult<HierarchyReport> {
        let rows = self.repository.hierarchy.fetch_rows().await?;
        Ok(build_hierarchy(&rows))
    }
}

struct ClientAcc {
    name: String,
    equipment_ids: IndexSet<i32>,
    activity_ids: IndexSet<i32>,
    groups: IndexMap<Option<i32>, GroupAcc>,
}

struct GroupAcc {
    state: Option<ActivityState>,
    equipment: IndexMap<i32, HierarchyEquipment>,
}

/// Fold the flat rows into ordered client aggregates.
///
/// Clients keep first-seen input order. Within a client, rows group by
/// activity id; a null activity id folds into one synthetic "unassigned"
/// bucket. Equipment repeats across buckets but is de-duplicated within
/// each bucket, and counted once per client.
pub fn build_hierarchy(rows: &[HierarchyRow]) -> HierarchyReport {
    let mut clients: IndexMap<i32, ClientAcc> = IndexMap::new();

    for row in rows {
        let client = clients.entry(row.client_id).or_insert_with(|| ClientAcc {
            name: row.client_name.clone(),
            equipment_ids: IndexSet::new(),
            activity_ids: IndexSet::new(),
            groups: IndexMap::new(),
        });

        client.equipment_ids.insert(row.equipment_id);
        if let Some(activity_id) = row.activity_id {
            client.activity_ids.insert(activity_id);
        }

        let group = client.groups.entry(row.activity_id).or_insert_with(|| GroupAcc {
            state: row.activity_state,
            equipment: IndexMap::new(),
        });
        group
            .equipment
            .entry(row.equipment_id)
            .or_insert_with(|| HierarchyEquipment {
                id: row.equipment_id,
                model_name: row.model_name.clone(),
                serial: row.serial.clone(),
            });
    }

    let mut total_equipment = 0i64;
    let mut total_activities = 0i64;

    let clients: Vec<HierarchyClient> = clients
        .into_iter()
        .map(|(id, acc)| {
            let equipment_count = acc.equipment_ids.len() as i64;
            let activities_count = acc.activity_ids.len() as i64;
            total_equipment += equipment_count;
            total_activities += activities_count;

            HierarchyClient {
                id,
                name: acc.name,
                equipment_count,
                activities_count,
                groups: acc
                    .groups
                    .into_iter()
                    .map(|(activity_id, group)| HierarchyGroup {
                        activity_id,
                        state: group.state,
                        equipment: group.equipment.into_values().collect(),
                    })
                    .collect(),
            }
        })
        .collect();

    HierarchyReport {
        total_clients: clients.len() as i64,
        total_equipment,
        total_activities,
        clients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn row(
        client_id: i32,
        equipment_id: i32,
        activity: Option<(i32, ActivityState)>,
    ) -> HierarchyRow {
        HierarchyRow {
            client_id,
            client_name: format!("Client {}", client_id),
            equipment_id,
            model_name: Some(format!("Model of e{}", equipment_id)),
            serial: None,
            activity_id: activity.map(|(id, _)| id),
            activity_state: activity.map(|(_, state)| state),
        }
    }

    #[test]
    fn test_empty_input() {
        let report = build_hierarchy(&[]);
        assert!(report.clients.is_empty());
        assert_eq!(report.total_clients, 0);
        assert_eq!(report.total_equipment, 0);
        assert_eq!(report.total_activities, 0);
    }

    #[test]
    fn test_clients_keep_first_seen_order() {
        let rows = vec![
            row(7, 1, None),
            row(2, 2, None),
            row(7, 3, None),
            row(5, 4, None),
        ];
        let report = build_hierarchy(&rows);
        let ids: Vec<i32> = report.clients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn test_null_activities_fold_into_one_unassigned_bucket() {
        let rows = vec![
            row(1, 10, None),
            row(1, 11, Some((100, ActivityState::Open))),
            row(1, 12, None),
        ];
        let report = build_hierarchy(&rows);
        let client = &report.clients[0];

        let unassigned: Vec<&HierarchyGroup> = client
            .groups
            .iter()
            .filter(|g| g.activity_id.is_none())
            .collect();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].equipment.len(), 2);
        assert_eq!(client.groups.len(), 2);
    }

    #[test]
    fn test_equipment_deduplicated_within_bucket() {
        let rows = vec![
            row(1, 10, Some((100, ActivityState::Open))),
            row(1, 10, Some((100, ActivityState::Open))),
            row(1, 10, Some((200, ActivityState::Closed))),
        ];
        let report = build_hierarchy(&rows);
        let client = &report.clients[0];

        for group in &client.groups {
            assert_eq!(group.equipment.len(), 1);
        }
        // Same unit under two activities still counts once per client
        assert_eq!(client.equipment_count, 1);
        assert_eq!(client.activities_count, 2);
    }

    #[test]
    fn test_group_carries_activity_state() {
        let rows = vec![row(1, 10, Some((100, ActivityState::Reopened)))];
        let report = build_hierarchy(&rows);
        let group = &report.clients[0].groups[0];
        assert_eq!(group.activity_id, Some(100));
        assert_eq!(group.state, Some(ActivityState::Reopened));
    }

    #[test]
    fn test_counts_match_distinct_pairs() {
        // Mixed shape: shared equipment, repeated rows, null activities
        let rows = vec![
            row(1, 10, Some((100, ActivityState::Open))),
            row(1, 10, Some((101, ActivityState::Open))),
            row(1, 11, None),
            row(2, 20, Some((200, ActivityState::Closed))),
            row(2, 20, Some((200, ActivityState::Closed))),
            row(2, 21, Some((200, ActivityState::Closed))),
            row(3, 30, None),
        ];
        let report = build_hierarchy(&rows);

        let distinct_equipment: HashSet<(i32, i32)> = rows
            .iter()
            .map(|r| (r.client_id, r.equipment_id))
            .collect();
        let distinct_activities: HashSet<(i32, i32)> = rows
            .iter()
            .filter_map(|r| r.activity_id.map(|a| (r.client_id, a)))
            .collect();

        let equipment_sum: i64 = report.clients.iter().map(|c| c.equipment_count).sum();
        let activities_sum: i64 = report.clients.iter().map(|c| c.activities_count).sum();

        assert_eq!(equipment_sum, distinct_equipment.len() as i64);
        assert_eq!(activities_sum, distinct_activities.len() as i64);
        assert_eq!(report.total_equipment, equipment_sum);
        assert_eq!(report.total_activities, activities_sum);
        assert_eq!(report.total_clients, 3);
    }
}
