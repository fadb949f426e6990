use std::collections::HashSet;

use uuid::Uuid;

use crate::db::models::{Answer, AssignGroup, Evaluation, Item, Response, Template};
use crate::db::types::EvaluationState;
use crate::services::access::AccessDecision;
use crate::services::lifecycle::derive_state;
use crate::services::modification_registry::registry;

use super::error::{require_non_blank, ServiceError, ServiceResult};
use super::types::{EvaluationUpdate, NewAnswer, NewEvaluation, NewTemplate};
use super::EvaluationService;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn ensure(decision: AccessDecision, message: &'static str) -> ServiceResult<()> {
    if decision.allowed {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied(message))
    }
}

impl EvaluationService {
    pub(crate) async fn create_template(
        &self,
        user_id: &str,
        payload: NewTemplate,
    ) -> ServiceResult<(Template, Vec<Item>)> {
        ensure(
            self.policy(self.now()).begin(user_id).await?,
            "Not allowed to create evaluation templates",
        )?;
        require_non_blank(&payload.title, "title")?;
        if payload.items.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "template needs at least one item".to_string(),
            ));
        }
        if payload.items.iter().any(|text| text.trim().is_empty()) {
            return Err(ServiceError::InvalidArgument("item text must not be blank".to_string()));
        }

        let now = self.now();
        let template = Template {
            id: new_id(),
            owner_id: user_id.to_string(),
            title: payload.title,
            description: payload.description,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<Item> = payload
            .items
            .into_iter()
            .enumerate()
            .map(|(index, text)| Item {
                id: new_id(),
                template_id: template.id.clone(),
                text,
                order_index: index as i32,
            })
            .collect();

        self.store.insert_template(&template, &items).await?;
        tracing::info!(template_id = %template.id, owner = user_id, items = items.len(), "Template created");

        Ok((template, items))
    }

    pub(crate) async fn create_evaluation(
        &self,
        user_id: &str,
        payload: NewEvaluation,
    ) -> ServiceResult<Evaluation> {
        let now = self.now();
        ensure(self.policy(now).begin(user_id).await?, "Not allowed to create evaluations")?;
        require_non_blank(&payload.title, "title")?;
        if payload.reminder_days < 0 {
            return Err(ServiceError::InvalidArgument(
                "reminder_days must not be negative".to_string(),
            ));
        }
        if self.store.find_template(&payload.template_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("template {}", payload.template_id)));
        }
        if let Some(eid) = payload.eid.as_deref() {
            require_non_blank(eid, "eid")?;
            if self.store.find_evaluation_by_eid(eid).await?.is_some() {
                return Err(ServiceError::InvalidArgument(format!("eid {eid} is already in use")));
            }
        }

        let mut evaluation = Evaluation {
            id: new_id(),
            eid: payload.eid,
            template_id: payload.template_id,
            owner_id: user_id.to_string(),
            title: payload.title,
            instructions: payload.instructions,
            start_date: payload.start_date,
            due_date: payload.due_date,
            stop_date: payload.stop_date,
            view_date: payload.view_date,
            instructors_date: payload.instructors_date,
            students_date: payload.students_date,
            reminder_days: payload.reminder_days,
            results_private: payload.results_private,
            auth_control: payload.auth_control,
            modify_responses_allowed: payload.modify_responses_allowed,
            blank_responses_allowed: payload.blank_responses_allowed,
            force_closed: false,
            state: EvaluationState::InQueue,
            created_at: now,
            updated_at: now,
        };
        evaluation.state = derive_state(&evaluation, now);

        self.store.insert_evaluation(&evaluation).await?;
        tracing::info!(
            evaluation_id = %evaluation.id,
            owner = user_id,
            state = evaluation.state.as_str(),
            "Evaluation created"
        );

        Ok(evaluation)
    }

    /// Applies a partial edit. Every changed field has to be editable in
    /// the evaluation's current lifecycle state.
    pub(crate) async fn update_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
        update: EvaluationUpdate,
    ) -> ServiceResult<Evaluation> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        let now = self.now();
        let decision = self.policy(now).control(user_id, &evaluation).await?;
        ensure(decision, "Not allowed to modify this evaluation")?;

        let state = derive_state(&evaluation, now);
        let mut updated = evaluation.clone();
        let changed = update.apply_to(&mut updated);

        if let Some(field) = registry().first_forbidden(state, changed.iter().copied()) {
            return Err(ServiceError::InvalidArgument(format!(
                "{field} cannot be modified while the evaluation is {}",
                state.as_str()
            )));
        }
        if changed.is_empty() {
            return Ok(evaluation);
        }

        self.persist_edit(updated, now).await
    }

    /// Closes the evaluation ahead of its dates. Results still wait for the
    /// view date when one is set.
    pub(crate) async fn close_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<Evaluation> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        let now = self.now();
        let decision = self.policy(now).control(user_id, &evaluation).await?;
        ensure(decision, "Not allowed to close this evaluation")?;

        if derive_state(&evaluation, now) == EvaluationState::InQueue {
            return Err(ServiceError::InvalidArgument(
                "evaluation has not started; remove it instead".to_string(),
            ));
        }
        if evaluation.force_closed {
            return Ok(evaluation);
        }

        let mut updated = evaluation;
        updated.force_closed = true;
        let closed = self.persist_edit(updated, now).await?;
        tracing::info!(evaluation_id = %closed.id, by = user_id, "Evaluation closed early");
        Ok(closed)
    }

    pub(crate) async fn remove_evaluation(
        &self,
        user_id: &str,
        evaluation_id: &str,
    ) -> ServiceResult<()> {
        let evaluation = self.require_evaluation(evaluation_id).await?;
        let decision = self.policy(self.now()).remove(user_id, &evaluation).await?;
        ensure(decision, "Evaluation can only be removed by its owner before it starts")?;

        self.store.delete_evaluation(&evaluation.id).await?;
        tracing::info!(evaluation_id = %evaluation.id, by = user_id, "Evaluation removed");
        Ok(())
    }

    /// Assigns the evaluation to each group not assigned yet and returns the
    /// newly created assignments. An `eid` can only tag a single group.
    pub(crate) async fn assign_groups(
        &self,
        user_id: &str,
        evaluation_id: &str,
        group_refs: &[String],
        eid: Option<String>,
    ) -> ServiceResult<Vec<AssignGroup>> {
        if group_refs.is_empty() {
            return Err(ServiceError::InvalidArgument("group refs must not be empty".to_string()));
        }
        for group_ref in group_refs {
            require_non_blank(group_ref, "group ref")?;
        }
        if eid.is_some() && group_refs.len() > 1 {
            return Err(ServiceError::InvalidArgument(
                "an eid can only be set when assigning a single group".to_string(),
            ));
        }

        let evaluation = self.require_evaluation(evaluation_id).await?;
        let now = self.now();
        let decision = self.policy(now).create_assignment(user_id, &evaluation).await?;
        ensure(decision, "Not allowed to assign groups to this evaluation")?;

        if let Some(eid) = eid.as_deref() {
            require_non_blank(eid, "eid")?;
            if self.store.find_assign_group_by_eid(eid).await?.is_some() {
                return Err(ServiceError::InvalidArgument(format!("eid {eid} is already in use")));
            }
        }

        let mut seen = HashSet::new();
        let mut created = Vec::new();
        for group_ref in group_refs {
            if !seen.insert(group_ref.as_str()) {
                continue;
            }
            if self.store.find_assign_group_for(&evaluation.id, group_ref).await?.is_some() {
                continue;
            }
            if self.groups.resolve_group(group_ref).await?.is_none() {
                tracing::warn!(
                    evaluation_id = %evaluation.id,
                    group_ref = %group_ref,
                    "Assigning evaluation to a group the directory does not know"
                );
            }

            let assignment = AssignGroup {
                id: new_id(),
                eid: eid.clone(),
                evaluation_id: evaluation.id.clone(),
                group_ref: group_ref.clone(),
                owner_id: user_id.to_string(),
                instructor_approval: true,
                created_at: now,
            };
            self.store.insert_assign_group(&assignment).await?;
            created.push(assignment);
        }

        tracing::info!(
            evaluation_id = %evaluation.id,
            requested = group_refs.len(),
            created = created.len(),
            "Groups assigned"
        );
        Ok(created)
    }

    pub(crate) async fn delete_assign_group(
        &self,
        user_id: &str,
        assign_group_id: &str,
    ) -> ServiceResult<()> {
        let assignment = self
            .store
            .find_assign_group(assign_group_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("assign group {assign_group_id}")))?;
        let evaluation = self.require_evaluation(&assignment.evaluation_id).await?;
        let decision = self.policy(self.now()).delete_assignment(user_id, &evaluation).await?;
        ensure(decision, "Group assignments can only be removed before the evaluation starts")?;

        self.store.delete_assign_group(&assignment.id).await?;
        tracing::info!(assign_group_id = %assignment.id, by = user_id, "Group assignment removed");
        Ok(())
    }

    /// Records the actor's answers for one group. A first submission needs
    /// the take permission; later saves also need the response to be
    /// modifiable.
    pub(crate) async fn save_response(
        &self,
        user_id: &str,
        evaluation_id: &str,
        group_ref: &str,
        answers: Vec<NewAnswer>,
        complete: bool,
    ) -> ServiceResult<Response> {
        require_non_blank(group_ref, "group ref")?;
        let evaluation = self.require_evaluation(evaluation_id).await?;
        self.refresh_state(&evaluation).await?;
        let now = self.now();
        let policy = self.policy(now);

        ensure(
            policy.take(user_id, &evaluation, group_ref).await?,
            "Evaluation cannot be taken for this group",
        )?;

        let previous = self.store.find_response_for(&evaluation.id, user_id, group_ref).await?;
        if let Some(previous) = previous.as_ref() {
            ensure(policy.modify_response(user_id, previous), "Response can no longer be modified")?;
        }

        let items = self.store.list_template_items(&evaluation.template_id).await?;
        let known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let mut answered = HashSet::new();
        for answer in &answers {
            if !known.contains(answer.item_id.as_str()) {
                return Err(ServiceError::InvalidArgument(format!(
                    "item {} does not belong to this evaluation",
                    answer.item_id
                )));
            }
            if !answered.insert(answer.item_id.as_str()) {
                return Err(ServiceError::InvalidArgument(format!(
                    "item {} answered more than once",
                    answer.item_id
                )));
            }
        }

        if complete && !evaluation.blank_responses_allowed {
            let filled: HashSet<&str> = answers
                .iter()
                .filter(|answer| !answer.is_blank())
                .map(|answer| answer.item_id.as_str())
                .collect();
            if let Some(missing) = items.iter().find(|item| !filled.contains(item.id.as_str())) {
                return Err(ServiceError::InvalidArgument(format!(
                    "item {} must be answered",
                    missing.id
                )));
            }
        }

        let response = match previous {
            Some(previous) => Response {
                completed_at: if complete { Some(now) } else { previous.completed_at },
                updated_at: now,
                ..previous
            },
            None => Response {
                id: new_id(),
                evaluation_id: evaluation.id.clone(),
                group_ref: group_ref.to_string(),
                owner_id: user_id.to_string(),
                started_at: now,
                completed_at: complete.then_some(now),
                locked: false,
                created_at: now,
                updated_at: now,
            },
        };

        let answers: Vec<Answer> = answers
            .into_iter()
            .filter(|answer| !answer.is_blank())
            .map(|answer| Answer {
                id: new_id(),
                response_id: response.id.clone(),
                item_id: answer.item_id,
                numeric_value: answer.numeric_value,
                text_value: answer.text_value,
                created_at: now,
            })
            .collect();

        if !self.store.save_response(&response, &answers).await? {
            tracing::warn!(
                evaluation_id = %evaluation.id,
                group_ref,
                owner = user_id,
                "Response already recorded by a concurrent submission"
            );
            return Err(ServiceError::PermissionDenied("Response already submitted for this group"));
        }
        tracing::info!(
            response_id = %response.id,
            evaluation_id = %evaluation.id,
            complete,
            answers = answers.len(),
            "Response saved"
        );

        Ok(response)
    }

    async fn persist_edit(
        &self,
        mut evaluation: Evaluation,
        now: time::PrimitiveDateTime,
    ) -> ServiceResult<Evaluation> {
        evaluation.updated_at = now;
        self.store.update_evaluation(&evaluation).await?;
        evaluation.state = self.refresh_state(&evaluation).await?;
        Ok(evaluation)
    }
}
