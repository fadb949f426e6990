//! In-memory stand-in for Postgres and the platform directory.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::PrimitiveDateTime;

use crate::db::models::{
    Answer, AssignGroup, AssignHierarchy, EvalGroup, Evaluation, Item, Response, Template, User,
};
use crate::db::types::{EvaluationState, GroupPermission};
use crate::services::evaluations::store::{
    EvaluationStore, GroupResolver, IdentityProvider, ResponseFilter, StoreResult,
};

#[derive(Default)]
pub(crate) struct Data {
    pub(crate) users: HashMap<String, User>,
    pub(crate) permissions: HashSet<(String, String, GroupPermission)>,
    pub(crate) groups: HashMap<String, EvalGroup>,
    pub(crate) templates: Vec<Template>,
    pub(crate) items: Vec<Item>,
    pub(crate) evaluations: Vec<Evaluation>,
    pub(crate) assign_groups: Vec<AssignGroup>,
    pub(crate) assign_hierarchy: Vec<AssignHierarchy>,
    pub(crate) responses: Vec<Response>,
    pub(crate) answers: Vec<Answer>,
    pub(crate) state_writes: usize,
}

#[derive(Default)]
pub(crate) struct MemoryDirectory {
    data: Mutex<Data>,
}

impl MemoryDirectory {
    pub(crate) fn new(data: Data) -> Self {
        Self { data: Mutex::new(data) }
    }

    pub(crate) fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().expect("memory directory lock")
    }

    pub(crate) fn state_writes(&self) -> usize {
        self.data().state_writes
    }
}

fn matches_filter(response: &Response, filter: &ResponseFilter) -> bool {
    filter.evaluation_ids.contains(&response.evaluation_id)
        && filter.owner_id.as_ref().map_or(true, |owner| &response.owner_id == owner)
        && (filter.group_refs.is_empty() || filter.group_refs.contains(&response.group_ref))
        && filter.completed.map_or(true, |completed| response.is_complete() == completed)
}

#[async_trait]
impl EvaluationStore for MemoryDirectory {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_template(&self, id: &str) -> StoreResult<Option<Template>> {
        Ok(self.data().templates.iter().find(|template| template.id == id).cloned())
    }

    async fn insert_template(&self, template: &Template, items: &[Item]) -> StoreResult<()> {
        let mut data = self.data();
        data.templates.push(template.clone());
        data.items.extend_from_slice(items);
        Ok(())
    }

    async fn list_template_items(&self, template_id: &str) -> StoreResult<Vec<Item>> {
        let mut items: Vec<Item> =
            self.data().items.iter().filter(|item| item.template_id == template_id).cloned().collect();
        items.sort_by_key(|item| item.order_index);
        Ok(items)
    }

    async fn find_item(&self, id: &str) -> StoreResult<Option<Item>> {
        Ok(self.data().items.iter().find(|item| item.id == id).cloned())
    }

    async fn find_evaluation(&self, id: &str) -> StoreResult<Option<Evaluation>> {
        Ok(self.data().evaluations.iter().find(|evaluation| evaluation.id == id).cloned())
    }

    async fn find_evaluation_by_eid(&self, eid: &str) -> StoreResult<Option<Evaluation>> {
        Ok(self
            .data()
            .evaluations
            .iter()
            .find(|evaluation| evaluation.eid.as_deref() == Some(eid))
            .cloned())
    }

    async fn list_evaluations_by_template(
        &self,
        template_id: &str,
    ) -> StoreResult<Vec<Evaluation>> {
        Ok(self
            .data()
            .evaluations
            .iter()
            .filter(|evaluation| evaluation.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn count_evaluations_by_template(&self, template_id: &str) -> StoreResult<i64> {
        Ok(self.list_evaluations_by_template(template_id).await?.len() as i64)
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()> {
        self.data().evaluations.push(evaluation.clone());
        Ok(())
    }

    async fn update_evaluation(&self, evaluation: &Evaluation) -> StoreResult<()> {
        let mut data = self.data();
        if let Some(slot) = data.evaluations.iter_mut().find(|stored| stored.id == evaluation.id) {
            *slot = evaluation.clone();
        }
        Ok(())
    }

    async fn set_evaluation_state(
        &self,
        id: &str,
        state: EvaluationState,
        now: PrimitiveDateTime,
    ) -> StoreResult<()> {
        let mut data = self.data();
        data.state_writes += 1;
        if let Some(evaluation) = data.evaluations.iter_mut().find(|stored| stored.id == id) {
            evaluation.state = state;
            evaluation.updated_at = now;
        }
        Ok(())
    }

    async fn delete_evaluation(&self, id: &str) -> StoreResult<()> {
        let mut data = self.data();
        let response_ids: HashSet<String> = data
            .responses
            .iter()
            .filter(|response| response.evaluation_id == id)
            .map(|response| response.id.clone())
            .collect();
        data.answers.retain(|answer| !response_ids.contains(&answer.response_id));
        data.responses.retain(|response| response.evaluation_id != id);
        data.assign_groups.retain(|assignment| assignment.evaluation_id != id);
        data.assign_hierarchy.retain(|assignment| assignment.evaluation_id != id);
        data.evaluations.retain(|evaluation| evaluation.id != id);
        Ok(())
    }

    async fn find_assign_group(&self, id: &str) -> StoreResult<Option<AssignGroup>> {
        Ok(self.data().assign_groups.iter().find(|assignment| assignment.id == id).cloned())
    }

    async fn find_assign_group_by_eid(&self, eid: &str) -> StoreResult<Option<AssignGroup>> {
        Ok(self
            .data()
            .assign_groups
            .iter()
            .find(|assignment| assignment.eid.as_deref() == Some(eid))
            .cloned())
    }

    async fn find_assign_group_for(
        &self,
        evaluation_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<AssignGroup>> {
        Ok(self
            .data()
            .assign_groups
            .iter()
            .find(|assignment| {
                assignment.evaluation_id == evaluation_id && assignment.group_ref == group_ref
            })
            .cloned())
    }

    async fn list_assign_groups(
        &self,
        evaluation_ids: &[String],
        include_unapproved: bool,
    ) -> StoreResult<Vec<AssignGroup>> {
        Ok(self
            .data()
            .assign_groups
            .iter()
            .filter(|assignment| evaluation_ids.contains(&assignment.evaluation_id))
            .filter(|assignment| include_unapproved || assignment.instructor_approval)
            .cloned()
            .collect())
    }

    async fn count_assign_groups(&self, evaluation_id: &str) -> StoreResult<i64> {
        Ok(self
            .data()
            .assign_groups
            .iter()
            .filter(|assignment| assignment.evaluation_id == evaluation_id)
            .count() as i64)
    }

    async fn insert_assign_group(&self, assign_group: &AssignGroup) -> StoreResult<()> {
        self.data().assign_groups.push(assign_group.clone());
        Ok(())
    }

    async fn delete_assign_group(&self, id: &str) -> StoreResult<()> {
        self.data().assign_groups.retain(|assignment| assignment.id != id);
        Ok(())
    }

    async fn find_response(&self, id: &str) -> StoreResult<Option<Response>> {
        Ok(self.data().responses.iter().find(|response| response.id == id).cloned())
    }

    async fn find_response_for(
        &self,
        evaluation_id: &str,
        owner_id: &str,
        group_ref: &str,
    ) -> StoreResult<Option<Response>> {
        Ok(self
            .data()
            .responses
            .iter()
            .find(|response| {
                response.evaluation_id == evaluation_id
                    && response.owner_id == owner_id
                    && response.group_ref == group_ref
            })
            .cloned())
    }

    async fn list_responses(&self, filter: &ResponseFilter) -> StoreResult<Vec<Response>> {
        Ok(self
            .data()
            .responses
            .iter()
            .filter(|response| matches_filter(response, filter))
            .cloned()
            .collect())
    }

    async fn count_responses(&self, filter: &ResponseFilter) -> StoreResult<i64> {
        Ok(self.data().responses.iter().filter(|response| matches_filter(response, filter)).count()
            as i64)
    }

    async fn lock_responses(&self, evaluation_id: &str) -> StoreResult<u64> {
        let mut changed = 0;
        for response in self.data().responses.iter_mut() {
            if response.evaluation_id == evaluation_id && !response.locked {
                response.locked = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn save_response(&self, response: &Response, answers: &[Answer]) -> StoreResult<bool> {
        let mut data = self.data();
        let taken = data.responses.iter().any(|stored| {
            stored.id != response.id
                && stored.evaluation_id == response.evaluation_id
                && stored.group_ref == response.group_ref
                && stored.owner_id == response.owner_id
        });
        if taken {
            return Ok(false);
        }

        match data.responses.iter().position(|stored| stored.id == response.id) {
            Some(index) => {
                let locked = data.responses[index].locked || response.locked;
                data.responses[index] = Response { locked, ..response.clone() };
            }
            None => data.responses.push(response.clone()),
        }
        data.answers.retain(|answer| answer.response_id != response.id);
        data.answers.extend_from_slice(answers);
        Ok(true)
    }

    async fn list_answers(
        &self,
        item_id: &str,
        evaluation_id: &str,
        group_refs: &[String],
    ) -> StoreResult<Vec<Answer>> {
        let data = self.data();
        let response_ids: HashSet<&str> = data
            .responses
            .iter()
            .filter(|response| response.evaluation_id == evaluation_id)
            .filter(|response| group_refs.is_empty() || group_refs.contains(&response.group_ref))
            .map(|response| response.id.as_str())
            .collect();

        Ok(data
            .answers
            .iter()
            .filter(|answer| answer.item_id == item_id)
            .filter(|answer| response_ids.contains(answer.response_id.as_str()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityProvider for MemoryDirectory {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.data().users.get(user_id).cloned())
    }

    async fn is_admin(&self, user_id: &str) -> StoreResult<bool> {
        Ok(self.data().users.get(user_id).is_some_and(|user| user.is_admin))
    }

    async fn has_permission(
        &self,
        user_id: &str,
        group_ref: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool> {
        Ok(self.data().permissions.contains(&(
            user_id.to_string(),
            group_ref.to_string(),
            permission,
        )))
    }

    async fn has_permission_anywhere(
        &self,
        user_id: &str,
        permission: GroupPermission,
    ) -> StoreResult<bool> {
        Ok(self
            .data()
            .permissions
            .iter()
            .any(|(user, _, granted)| user == user_id && *granted == permission))
    }
}

#[async_trait]
impl GroupResolver for MemoryDirectory {
    async fn resolve_group(&self, group_ref: &str) -> StoreResult<Option<EvalGroup>> {
        Ok(self.data().groups.get(group_ref).cloned())
    }

    async fn find_assign_hierarchy(&self, id: &str) -> StoreResult<Option<AssignHierarchy>> {
        Ok(self.data().assign_hierarchy.iter().find(|assignment| assignment.id == id).cloned())
    }

    async fn list_assign_hierarchy(
        &self,
        evaluation_id: &str,
    ) -> StoreResult<Vec<AssignHierarchy>> {
        Ok(self
            .data()
            .assign_hierarchy
            .iter()
            .filter(|assignment| assignment.evaluation_id == evaluation_id)
            .cloned()
            .collect())
    }
}
