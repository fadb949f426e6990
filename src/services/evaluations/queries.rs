use std::collections::HashMap;

use crate::db::models::{
    Answer, AssignGroup, AssignHierarchy, EvalGroup, Evaluation, Response, User,
};

use super::error::{require_non_blank, ServiceError, ServiceResult};
use super::store::ResponseFilter;
use super::EvaluationService;

impl EvaluationService {
    pub(crate) async fn find_user(&self, user_id: &str) -> ServiceResult<Option<User>> {
        Ok(self.identity.find_user(user_id).await?)
    }

    /// Evaluation lookups return the refreshed lifecycle state and persist it
    /// when the cached column was stale.
    pub(crate) async fn get_evaluation_by_id(&self, id: &str) -> ServiceResult<Option<Evaluation>> {
        match self.store.find_evaluation(id).await? {
            Some(evaluation) => Ok(Some(self.with_current_state(evaluation).await?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn get_evaluation_by_eid(
        &self,
        eid: &str,
    ) -> ServiceResult<Option<Evaluation>> {
        if eid.trim().is_empty() {
            return Ok(None);
        }
        match self.store.find_evaluation_by_eid(eid).await? {
            Some(evaluation) => Ok(Some(self.with_current_state(evaluation).await?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn check_evaluation_exists(&self, id: &str) -> ServiceResult<bool> {
        require_non_blank(id, "evaluation id")?;
        Ok(self.store.find_evaluation(id).await?.is_some())
    }

    pub(crate) async fn count_evaluations_by_template_id(
        &self,
        template_id: &str,
    ) -> ServiceResult<i64> {
        self.require_template(template_id).await?;
        Ok(self.store.count_evaluations_by_template(template_id).await?)
    }

    pub(crate) async fn get_evaluations_by_template_id(
        &self,
        template_id: &str,
    ) -> ServiceResult<Vec<Evaluation>> {
        self.require_template(template_id).await?;

        let stored = self.store.list_evaluations_by_template(template_id).await?;
        let mut evaluations = Vec::with_capacity(stored.len());
        for evaluation in stored {
            evaluations.push(self.with_current_state(evaluation).await?);
        }
        Ok(evaluations)
    }

    pub(crate) async fn count_evaluation_groups(&self, evaluation_id: &str) -> ServiceResult<i64> {
        Ok(self.store.count_assign_groups(evaluation_id).await?)
    }

    pub(crate) async fn get_assign_group_by_id(
        &self,
        id: &str,
    ) -> ServiceResult<Option<AssignGroup>> {
        require_non_blank(id, "assign group id")?;
        Ok(self.store.find_assign_group(id).await?)
    }

    pub(crate) async fn get_assign_group_by_eid(
        &self,
        eid: &str,
    ) -> ServiceResult<Option<AssignGroup>> {
        require_non_blank(eid, "assign group eid")?;
        Ok(self.store.find_assign_group_by_eid(eid).await?)
    }

    pub(crate) async fn get_assign_group_id(
        &self,
        evaluation_id: &str,
        group_ref: &str,
    ) -> ServiceResult<Option<String>> {
        let assignment = self.store.find_assign_group_for(evaluation_id, group_ref).await?;
        Ok(assignment.map(|assignment| assignment.id))
    }

    pub(crate) async fn get_assign_hierarchy_by_id(
        &self,
        id: &str,
    ) -> ServiceResult<Option<AssignHierarchy>> {
        require_non_blank(id, "assign hierarchy id")?;
        Ok(self.groups.find_assign_hierarchy(id).await?)
    }

    pub(crate) async fn get_assign_hierarchy_by_eval(
        &self,
        evaluation_id: &str,
    ) -> ServiceResult<Vec<AssignHierarchy>> {
        require_non_blank(evaluation_id, "evaluation id")?;
        Ok(self.groups.list_assign_hierarchy(evaluation_id).await?)
    }

    /// Every requested id is a key of the result; unknown ids map to an
    /// empty list.
    pub(crate) async fn get_evaluation_assign_groups(
        &self,
        evaluation_ids: &[String],
        include_unapproved: bool,
    ) -> ServiceResult<HashMap<String, Vec<AssignGroup>>> {
        let mut grouped: HashMap<String, Vec<AssignGroup>> =
            evaluation_ids.iter().map(|id| (id.clone(), Vec::new())).collect();

        if evaluation_ids.is_empty() {
            return Ok(grouped);
        }

        for assignment in self.store.list_assign_groups(evaluation_ids, include_unapproved).await? {
            if let Some(bucket) = grouped.get_mut(&assignment.evaluation_id) {
                bucket.push(assignment);
            }
        }

        Ok(grouped)
    }

    pub(crate) async fn get_evaluation_groups(
        &self,
        evaluation_ids: &[String],
        include_unapproved: bool,
    ) -> ServiceResult<HashMap<String, Vec<EvalGroup>>> {
        let assignments = self.get_evaluation_assign_groups(evaluation_ids, include_unapproved).await?;

        let mut grouped = HashMap::with_capacity(assignments.len());
        for (evaluation_id, assigned) in assignments {
            let mut groups = Vec::with_capacity(assigned.len());
            for assignment in assigned {
                let group = self
                    .groups
                    .resolve_group(&assignment.group_ref)
                    .await?
                    .unwrap_or_else(|| EvalGroup::unknown(&assignment.group_ref));
                groups.push(group);
            }
            grouped.insert(evaluation_id, groups);
        }

        Ok(grouped)
    }

    pub(crate) async fn get_response_by_id(&self, id: &str) -> ServiceResult<Option<Response>> {
        Ok(self.store.find_response(id).await?)
    }

    pub(crate) async fn get_evaluation_response_for_user_and_group(
        &self,
        evaluation_id: &str,
        user_id: &str,
        group_ref: &str,
    ) -> ServiceResult<Option<Response>> {
        require_non_blank(user_id, "user id")?;
        require_non_blank(group_ref, "group ref")?;
        self.require_evaluation_argument(evaluation_id).await?;
        Ok(self.store.find_response_for(evaluation_id, user_id, group_ref).await?)
    }

    pub(crate) async fn get_eval_response_ids(
        &self,
        evaluation_id: &str,
        group_refs: Option<&[String]>,
        completed: Option<bool>,
    ) -> ServiceResult<Vec<String>> {
        self.require_evaluation_argument(evaluation_id).await?;

        let filter = ResponseFilter {
            evaluation_ids: vec![evaluation_id.to_string()],
            owner_id: None,
            group_refs: group_refs.map(<[String]>::to_vec).unwrap_or_default(),
            completed,
        };
        let responses = self.store.list_responses(&filter).await?;
        Ok(responses.into_iter().map(|response| response.id).collect())
    }

    pub(crate) async fn get_evaluation_responses(
        &self,
        user_id: Option<&str>,
        evaluation_ids: &[String],
        group_refs: Option<&[String]>,
        completed: Option<bool>,
    ) -> ServiceResult<Vec<Response>> {
        let filter = self.response_filter(user_id, evaluation_ids, group_refs, completed).await?;
        Ok(self.store.list_responses(&filter).await?)
    }

    pub(crate) async fn count_evaluation_responses(
        &self,
        user_id: Option<&str>,
        evaluation_ids: &[String],
        group_refs: Option<&[String]>,
        completed: Option<bool>,
    ) -> ServiceResult<i64> {
        let filter = self.response_filter(user_id, evaluation_ids, group_refs, completed).await?;
        Ok(self.store.count_responses(&filter).await?)
    }

    pub(crate) async fn get_eval_answers(
        &self,
        item_id: &str,
        evaluation_id: &str,
        group_refs: Option<&[String]>,
    ) -> ServiceResult<Vec<Answer>> {
        require_non_blank(item_id, "item id")?;
        if self.store.find_item(item_id).await?.is_none() {
            return Err(ServiceError::InvalidArgument(format!("unknown item id {item_id}")));
        }
        self.require_evaluation_argument(evaluation_id).await?;

        let groups = group_refs.unwrap_or_default();
        Ok(self.store.list_answers(item_id, evaluation_id, groups).await?)
    }

    async fn response_filter(
        &self,
        user_id: Option<&str>,
        evaluation_ids: &[String],
        group_refs: Option<&[String]>,
        completed: Option<bool>,
    ) -> ServiceResult<ResponseFilter> {
        if evaluation_ids.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "evaluation ids must contain at least one id".to_string(),
            ));
        }

        let owner_id = match user_id {
            Some(user_id) if !self.identity.is_admin(user_id).await? => Some(user_id.to_string()),
            _ => None,
        };

        Ok(ResponseFilter {
            evaluation_ids: evaluation_ids.to_vec(),
            owner_id,
            group_refs: group_refs.map(<[String]>::to_vec).unwrap_or_default(),
            completed,
        })
    }

    async fn require_template(&self, template_id: &str) -> ServiceResult<()> {
        match self.store.find_template(template_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!("template {template_id}"))),
        }
    }

    /// Lookups that take an evaluation id as an argument reject unknown ids
    /// as invalid input.
    async fn require_evaluation_argument(&self, evaluation_id: &str) -> ServiceResult<Evaluation> {
        require_non_blank(evaluation_id, "evaluation id")?;
        self.store.find_evaluation(evaluation_id).await?.ok_or_else(|| {
            ServiceError::InvalidArgument(format!("unknown evaluation id {evaluation_id}"))
        })
    }

    pub(super) async fn require_evaluation(&self, evaluation_id: &str) -> ServiceResult<Evaluation> {
        self.store
            .find_evaluation(evaluation_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("evaluation {evaluation_id}")))
    }
}
