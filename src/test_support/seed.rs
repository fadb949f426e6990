//! Shared fixture: users, groups, templates and evaluations spread across
//! every lifecycle state, with assignments, responses and answers.

use time::{Duration, PrimitiveDateTime};

use crate::core::time::primitive_now_utc;
use crate::db::models::{
    Answer, AssignGroup, AssignHierarchy, EvalGroup, Evaluation, Item, Response, Template, User,
};
use crate::db::types::{AuthControl, EvaluationState, GroupPermission, GroupType};
use crate::services::lifecycle::derive_state;

use super::memory::{Data, MemoryDirectory};

pub(crate) const ADMIN_USER_ID: &str = "admin-user";
pub(crate) const MAINT_USER_ID: &str = "maint-user";
pub(crate) const USER_ID: &str = "user-1";
pub(crate) const STUDENT_USER_ID: &str = "student-1";
pub(crate) const INVALID_USER_ID: &str = "invalid-user";

pub(crate) const SITE1_REF: &str = "/site/ref-1111";
pub(crate) const SITE2_REF: &str = "/site/ref-2222";
pub(crate) const SECTION1_REF: &str = "/site/ref-1111/section/a";
pub(crate) const INVALID_GROUP_REF: &str = "/site/invalid";

pub(crate) const INVALID_ID: &str = "no-such-id";

pub(crate) const TEMPLATE_PUBLIC_ID: &str = "template-public";
pub(crate) const TEMPLATE_USER_ID: &str = "template-user";
pub(crate) const TEMPLATE_ADMIN_ID: &str = "template-admin";
pub(crate) const TEMPLATE_UNUSED_ID: &str = "template-unused";

pub(crate) const ITEM1_ID: &str = "item-1";
pub(crate) const ITEM2_ID: &str = "item-2";
pub(crate) const ITEM3_ID: &str = "item-3";
pub(crate) const ITEM4_ID: &str = "item-4";
pub(crate) const ITEM5_ID: &str = "item-5";

pub(crate) const EVAL_NEW_ID: &str = "eval-new";
pub(crate) const EVAL_NEW_ADMIN_ID: &str = "eval-new-admin";
pub(crate) const EVAL_QUEUED_ID: &str = "eval-queued";
pub(crate) const EVAL_ACTIVE_ID: &str = "eval-active";
pub(crate) const EVAL_ACTIVE_UNTAKEN_ID: &str = "eval-active-untaken";
pub(crate) const EVAL_PROVIDED_ID: &str = "eval-provided";
pub(crate) const EVAL_CLOSED_ID: &str = "eval-closed";
pub(crate) const EVAL_VIEWABLE_ID: &str = "eval-viewable";
pub(crate) const EVAL_PROVIDED_EID: &str = "provided-eval-eid";

pub(crate) const ASSIGN1_ID: &str = "assign-1";
pub(crate) const ASSIGN2_ID: &str = "assign-2";
pub(crate) const ASSIGN3_ID: &str = "assign-3";
pub(crate) const ASSIGN4_ID: &str = "assign-4";
pub(crate) const ASSIGN5_ID: &str = "assign-5";
pub(crate) const ASSIGN6_ID: &str = "assign-6";
pub(crate) const ASSIGN7_ID: &str = "assign-7";
pub(crate) const ASSIGN_PROVIDED_ID: &str = "assign-provided";
pub(crate) const ASSIGN_UNAPPROVED_ID: &str = "assign-unapproved";
pub(crate) const ASSIGN_PROVIDED_EID: &str = "provided-assign-eid";
pub(crate) const ASSIGN_HIER1_ID: &str = "assign-hier-1";

pub(crate) const RESPONSE1_ID: &str = "response-1";
pub(crate) const RESPONSE2_ID: &str = "response-2";
pub(crate) const RESPONSE3_ID: &str = "response-3";
pub(crate) const RESPONSE4_ID: &str = "response-4";
pub(crate) const RESPONSE5_ID: &str = "response-5";
pub(crate) const RESPONSE6_ID: &str = "response-6";

pub(crate) const ANSWER1_1_ID: &str = "answer-1-1";
pub(crate) const ANSWER2_2_ID: &str = "answer-2-2";
pub(crate) const ANSWER2_5_ID: &str = "answer-2-5";
pub(crate) const ANSWER3_2_ID: &str = "answer-3-2";
pub(crate) const ANSWER4_1_ID: &str = "answer-4-1";
pub(crate) const ANSWER5_1_ID: &str = "answer-5-1";

fn at(days: i64) -> PrimitiveDateTime {
    primitive_now_utc() + Duration::days(days)
}

fn user(id: &str, display_name: &str, is_admin: bool) -> User {
    User { id: id.to_string(), display_name: display_name.to_string(), is_admin }
}

fn template(id: &str, owner_id: &str, title: &str) -> Template {
    let created = at(-30);
    Template {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        title: title.to_string(),
        description: None,
        created_at: created,
        updated_at: created,
    }
}

fn item(id: &str, template_id: &str, order_index: i32) -> Item {
    Item {
        id: id.to_string(),
        template_id: template_id.to_string(),
        text: format!("Question {id}"),
        order_index,
    }
}

/// Evaluation on the user template whose dates step one day apart after a
/// start `start_offset_days` from now (due +2, stop +3, view +4).
pub(crate) fn evaluation_fixture(id: &str, owner_id: &str, start_offset_days: i64) -> Evaluation {
    scheduled(
        id,
        owner_id,
        TEMPLATE_USER_ID,
        [start_offset_days, start_offset_days + 2, start_offset_days + 3, start_offset_days + 4],
    )
}

fn scheduled(id: &str, owner_id: &str, template_id: &str, days: [i64; 4]) -> Evaluation {
    let created = at(-30);
    let mut evaluation = Evaluation {
        id: id.to_string(),
        eid: None,
        template_id: template_id.to_string(),
        owner_id: owner_id.to_string(),
        title: format!("Evaluation {id}"),
        instructions: None,
        start_date: at(days[0]),
        due_date: Some(at(days[1])),
        stop_date: Some(at(days[2])),
        view_date: Some(at(days[3])),
        instructors_date: None,
        students_date: None,
        reminder_days: 0,
        results_private: false,
        auth_control: AuthControl::Required,
        modify_responses_allowed: false,
        blank_responses_allowed: false,
        force_closed: false,
        state: EvaluationState::InQueue,
        created_at: created,
        updated_at: created,
    };
    evaluation.state = derive_state(&evaluation, primitive_now_utc());
    evaluation
}

fn assignment(
    id: &str,
    evaluation_id: &str,
    group_ref: &str,
    owner_id: &str,
    order: i64,
) -> AssignGroup {
    AssignGroup {
        id: id.to_string(),
        eid: None,
        evaluation_id: evaluation_id.to_string(),
        group_ref: group_ref.to_string(),
        owner_id: owner_id.to_string(),
        instructor_approval: true,
        created_at: at(-20) + Duration::minutes(order),
    }
}

fn response(
    id: &str,
    evaluation_id: &str,
    group_ref: &str,
    owner_id: &str,
    locked: bool,
) -> Response {
    let when = at(-1);
    Response {
        id: id.to_string(),
        evaluation_id: evaluation_id.to_string(),
        group_ref: group_ref.to_string(),
        owner_id: owner_id.to_string(),
        started_at: when,
        completed_at: Some(when),
        locked,
        created_at: when,
        updated_at: when,
    }
}

fn answer(id: &str, response_id: &str, item_id: &str, value: i32) -> Answer {
    Answer {
        id: id.to_string(),
        response_id: response_id.to_string(),
        item_id: item_id.to_string(),
        numeric_value: Some(value),
        text_value: None,
        created_at: at(-1),
    }
}

pub(crate) fn seed_data() -> Data {
    let mut data = Data::default();

    for user in [
        user(ADMIN_USER_ID, "Admin", true),
        user(MAINT_USER_ID, "Maintainer", false),
        user(USER_ID, "Regular User", false),
        user(STUDENT_USER_ID, "Student", false),
    ] {
        data.users.insert(user.id.clone(), user);
    }

    for (group_ref, title, group_type) in [
        (SITE1_REF, "Site One", GroupType::Site),
        (SITE2_REF, "Site Two", GroupType::Site),
        (SECTION1_REF, "Section A", GroupType::Section),
    ] {
        data.groups.insert(
            group_ref.to_string(),
            EvalGroup { group_ref: group_ref.to_string(), title: title.to_string(), group_type },
        );
    }

    for (user_id, group_ref, permission) in [
        (MAINT_USER_ID, SITE1_REF, GroupPermission::AssignEvaluation),
        (MAINT_USER_ID, SITE2_REF, GroupPermission::AssignEvaluation),
        (USER_ID, SITE1_REF, GroupPermission::BeEvaluated),
        (USER_ID, SITE2_REF, GroupPermission::BeEvaluated),
        (STUDENT_USER_ID, SITE2_REF, GroupPermission::BeEvaluated),
    ] {
        data.permissions.insert((user_id.to_string(), group_ref.to_string(), permission));
    }

    data.templates = vec![
        template(TEMPLATE_PUBLIC_ID, ADMIN_USER_ID, "Public template"),
        template(TEMPLATE_USER_ID, MAINT_USER_ID, "Maintainer template"),
        template(TEMPLATE_ADMIN_ID, ADMIN_USER_ID, "Admin template"),
        template(TEMPLATE_UNUSED_ID, ADMIN_USER_ID, "Unused template"),
    ];
    data.items = vec![
        item(ITEM1_ID, TEMPLATE_USER_ID, 0),
        item(ITEM2_ID, TEMPLATE_USER_ID, 1),
        item(ITEM3_ID, TEMPLATE_PUBLIC_ID, 0),
        item(ITEM4_ID, TEMPLATE_PUBLIC_ID, 1),
        item(ITEM5_ID, TEMPLATE_ADMIN_ID, 0),
    ];

    let mut untaken = scheduled(EVAL_ACTIVE_UNTAKEN_ID, MAINT_USER_ID, TEMPLATE_PUBLIC_ID, [-1, 1, 2, 3]);
    untaken.auth_control = AuthControl::Anonymous;

    let mut provided = scheduled(EVAL_PROVIDED_ID, MAINT_USER_ID, TEMPLATE_USER_ID, [-1, 1, 2, 3]);
    provided.eid = Some(EVAL_PROVIDED_EID.to_string());

    // Cached state deliberately stale so a refresh has something to persist.
    let mut viewable = scheduled(EVAL_VIEWABLE_ID, ADMIN_USER_ID, TEMPLATE_USER_ID, [-5, -4, -3, -1]);
    viewable.state = EvaluationState::Closed;

    data.evaluations = vec![
        scheduled(EVAL_NEW_ID, MAINT_USER_ID, TEMPLATE_PUBLIC_ID, [1, 2, 3, 4]),
        scheduled(EVAL_NEW_ADMIN_ID, ADMIN_USER_ID, TEMPLATE_ADMIN_ID, [1, 2, 3, 4]),
        scheduled(EVAL_QUEUED_ID, MAINT_USER_ID, TEMPLATE_ADMIN_ID, [2, 3, 4, 5]),
        scheduled(EVAL_ACTIVE_ID, MAINT_USER_ID, TEMPLATE_USER_ID, [-1, 1, 2, 3]),
        untaken,
        provided,
        scheduled(EVAL_CLOSED_ID, ADMIN_USER_ID, TEMPLATE_ADMIN_ID, [-4, -3, -2, 2]),
        viewable,
    ];

    let mut assign_provided =
        assignment(ASSIGN_PROVIDED_ID, EVAL_PROVIDED_ID, SITE1_REF, MAINT_USER_ID, 7);
    assign_provided.eid = Some(ASSIGN_PROVIDED_EID.to_string());
    let mut assign_unapproved =
        assignment(ASSIGN_UNAPPROVED_ID, EVAL_PROVIDED_ID, SITE2_REF, MAINT_USER_ID, 8);
    assign_unapproved.instructor_approval = false;

    data.assign_groups = vec![
        assignment(ASSIGN1_ID, EVAL_ACTIVE_ID, SITE1_REF, MAINT_USER_ID, 0),
        assignment(ASSIGN2_ID, EVAL_ACTIVE_UNTAKEN_ID, SITE1_REF, MAINT_USER_ID, 1),
        assignment(ASSIGN3_ID, EVAL_CLOSED_ID, SITE1_REF, ADMIN_USER_ID, 2),
        assignment(ASSIGN4_ID, EVAL_CLOSED_ID, SITE2_REF, ADMIN_USER_ID, 3),
        assignment(ASSIGN5_ID, EVAL_VIEWABLE_ID, SITE2_REF, ADMIN_USER_ID, 4),
        assignment(ASSIGN6_ID, EVAL_QUEUED_ID, SITE1_REF, MAINT_USER_ID, 5),
        assignment(ASSIGN7_ID, EVAL_NEW_ADMIN_ID, SITE1_REF, ADMIN_USER_ID, 6),
        assign_provided,
        assign_unapproved,
    ];

    data.assign_hierarchy = vec![AssignHierarchy {
        id: ASSIGN_HIER1_ID.to_string(),
        evaluation_id: EVAL_ACTIVE_ID.to_string(),
        node_id: "hier-node-1".to_string(),
        owner_id: MAINT_USER_ID.to_string(),
        created_at: at(-20),
    }];

    data.responses = vec![
        response(RESPONSE1_ID, EVAL_ACTIVE_ID, SITE1_REF, USER_ID, false),
        response(RESPONSE2_ID, EVAL_CLOSED_ID, SITE1_REF, USER_ID, false),
        response(RESPONSE3_ID, EVAL_CLOSED_ID, SITE2_REF, STUDENT_USER_ID, true),
        response(RESPONSE4_ID, EVAL_VIEWABLE_ID, SITE2_REF, USER_ID, false),
        response(RESPONSE5_ID, EVAL_VIEWABLE_ID, SITE2_REF, STUDENT_USER_ID, true),
        response(RESPONSE6_ID, EVAL_CLOSED_ID, SITE2_REF, USER_ID, false),
    ];

    data.answers = vec![
        answer(ANSWER1_1_ID, RESPONSE1_ID, ITEM1_ID, 3),
        answer(ANSWER2_2_ID, RESPONSE2_ID, ITEM2_ID, 4),
        answer(ANSWER2_5_ID, RESPONSE2_ID, ITEM5_ID, 2),
        answer(ANSWER3_2_ID, RESPONSE3_ID, ITEM2_ID, 5),
        answer(ANSWER4_1_ID, RESPONSE4_ID, ITEM1_ID, 1),
        answer(ANSWER5_1_ID, RESPONSE5_ID, ITEM1_ID, 2),
    ];

    data
}

pub(crate) fn seeded_directory() -> MemoryDirectory {
    MemoryDirectory::new(seed_data())
}
