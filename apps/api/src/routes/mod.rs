pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::{agents, auth, intake, plans, progress};

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        .route("/api/auth/me", get(auth::handlers::handle_me))
        // Intake
        .route("/api/intake/start", post(intake::handlers::handle_start))
        .route(
            "/api/intake/:session_id/message",
            post(intake::handlers::handle_message),
        )
        .route(
            "/api/intake/:session_id",
            get(intake::handlers::handle_get_session),
        )
        // Plans
        .route("/api/plans", get(plans::handlers::handle_get_plan))
        .route("/api/plans/generate", post(plans::handlers::handle_generate))
        .route(
            "/api/plans/:plan_id/regenerate",
            put(plans::handlers::handle_regenerate),
        )
        // Agents (list and details are public)
        .route("/api/agents", get(agents::handlers::handle_list_agents))
        .route(
            "/api/agents/:agent_id",
            get(agents::handlers::handle_get_agent),
        )
        .route(
            "/api/agents/:agent_id/chat",
            post(agents::handlers::handle_chat),
        )
        .route(
            "/api/agents/:agent_id/conversation",
            get(agents::handlers::handle_conversation),
        )
        // Progress
        .route("/api/progress", get(progress::handlers::handle_dashboard))
        .route(
            "/api/progress/detailed",
            get(progress::handlers::handle_detailed),
        )
        .route(
            "/api/progress/task",
            put(progress::handlers::handle_update_task),
        )
        .route(
            "/api/progress/milestone/:milestone_id/complete",
            post(progress::handlers::handle_complete_milestone),
        )
        .fallback(route_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedLlm;
    use crate::storage::memory::MemoryStore;

    const DONE_REPLY: &str = "Thank you! I have all the information I need to create your plan.";

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            anthropic_api_key: "unused".to_string(),
            jwt_secret: "router-test-secret".to_string(),
            jwt_expiry_days: 7,
            frontend_url: "http://localhost:3000".to_string(),
            environment: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(llm: Arc<ScriptedLlm>) -> Router {
        let state = AppState::new(Arc::new(MemoryStore::new()), llm, test_config());
        build_router(state)
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": email, "name": "Robin", "password": "s3cure-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    fn plan_reply() -> String {
        json!({"phases": [
            {"phaseNumber": 1, "title": "Foundations", "duration": "1 month", "description": "",
             "milestones": [{"id": "milestone_1_1", "title": "Basics", "description": "",
                             "estimatedDuration": "2 weeks",
                             "tasks": [{"id": "task_1_1_1", "title": "Read", "description": "", "resources": []},
                                       {"id": "task_1_1_2", "title": "Practice", "description": "", "resources": []}]}]},
            {"phaseNumber": 2, "title": "Portfolio", "duration": "2 months", "description": "",
             "milestones": [{"id": "milestone_2_1", "title": "Project", "description": "",
                             "estimatedDuration": "1 month",
                             "tasks": [{"id": "task_2_1_1", "title": "Build", "description": "", "resources": []}]}]}
        ]})
        .to_string()
    }

    #[tokio::test]
    async fn test_health_reports_environment() {
        let app = app(Arc::new(ScriptedLlm::new()));
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_uniform_error_body() {
        let app = app(Arc::new(ScriptedLlm::new()));
        let (status, body) = call(&app, Method::GET, "/api/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Route not found");
        assert_eq!(body["error"]["statusCode"], 404);
    }

    #[tokio::test]
    async fn test_missing_and_bad_tokens_are_rejected() {
        let app = app(Arc::new(ScriptedLlm::new()));

        let (status, body) = call(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "No token provided");
        assert_eq!(body["error"]["statusCode"], 401);

        let (status, body) =
            call(&app, Method::GET, "/api/progress", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let app = app(Arc::new(ScriptedLlm::new()));
        let token = register(&app, "robin@example.com").await;

        let (status, me) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "robin@example.com");
        assert!(me.get("passwordHash").is_none());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "robin@example.com", "name": "R", "password": "another-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "User with this email already exists");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "robin@example.com", "password": "wrong-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid email or password");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "robin@example.com", "password": "s3cure-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Robin");
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_400() {
        let app = app(Arc::new(ScriptedLlm::new()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "nope", "name": "R", "password": "long-enough"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let token = register(&app, "v@example.com").await;
        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/progress/task",
            Some(&token),
            Some(json!({"taskId": "task_1_1_1", "completed": "yes"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "completed must be a boolean");
    }

    #[tokio::test]
    async fn test_public_agent_routes() {
        let app = app(Arc::new(ScriptedLlm::new()));

        let (status, body) = call(&app, Method::GET, "/api/agents", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agents"].as_array().unwrap().len(), 5);

        let (status, body) = call(&app, Method::GET, "/api/agents/jordan", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jordan");

        let (status, _) = call(&app, Method::GET, "/api/agents/zed", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_intake_to_plan_to_progress_flow() {
        let llm = Arc::new(ScriptedLlm::with_replies([
            "What is your current role?".to_string(),
            DONE_REPLY.to_string(),
            r#"{"currentRole": "Teacher", "targetRole": "Data Analyst", "timeline": "6 months"}"#
                .to_string(),
            plan_reply(),
        ]));
        let app = app(llm.clone());
        let token = register(&app, "flow@example.com").await;

        let (status, started) =
            call(&app, Method::POST, "/api/intake/start", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["question"], "What is your current role?");
        let session_id = started["sessionId"].as_str().unwrap().to_string();

        // Plan generation before the interview is finished is a business-rule error.
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/plans/generate",
            Some(&token),
            Some(json!({"sessionId": session_id})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, turn) = call(
            &app,
            Method::POST,
            &format!("/api/intake/{session_id}/message"),
            Some(&token),
            Some(json!({"message": "I teach maths and want to move into data in 6 months"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["isComplete"], true);
        assert_eq!(turn["currentStep"], 2);

        let (_, session) = call(
            &app,
            Method::GET,
            &format!("/api/intake/{session_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(session["collectedData"]["targetRole"], "Data Analyst");

        let (status, generated) = call(
            &app,
            Method::POST,
            "/api/plans/generate",
            Some(&token),
            Some(json!({"sessionId": session_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(generated["phases"].as_array().unwrap().len(), 2);

        let (status, plan) = call(&app, Method::GET, "/api/plans", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["targetRole"], "Data Analyst");
        assert_eq!(plan["progress"]["currentPhase"], 0);

        let (status, stats) = call(
            &app,
            Method::POST,
            "/api/progress/milestone/milestone_1_1/complete",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["completedTasks"], 2);
        assert_eq!(stats["totalTasks"], 3);
        assert_eq!(stats["currentPhase"], 1);
        assert_eq!(stats["message"], "Milestone completed! Great job!");

        let (status, stats) = call(
            &app,
            Method::PUT,
            "/api/progress/task",
            Some(&token),
            Some(json!({"taskId": "task_1_1_2", "completed": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["completedTasks"], 1);
        assert_eq!(stats["currentPhase"], 0);
        assert_eq!(stats["message"], "Task unmarked");

        let (status, dashboard) =
            call(&app, Method::GET, "/api/progress", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["completedTasks"], 1);
        assert_eq!(dashboard["activityData"].as_array().unwrap().len(), 7);
        assert_eq!(dashboard["achievements"][0]["id"], "first-task");

        let (status, detailed) =
            call(&app, Method::GET, "/api/progress/detailed", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detailed["phases"][0]["tasksCompleted"], 1);

        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_regenerate_phase_endpoint() {
        let regenerated = json!({
            "phaseNumber": 9, "title": "Foundations, revisited", "duration": "1 month",
            "description": "", "milestones": []
        });
        let llm = Arc::new(ScriptedLlm::with_replies([
            "What is your current role?".to_string(),
            DONE_REPLY.to_string(),
            r#"{"currentRole": "Nurse", "targetRole": "UX Researcher"}"#.to_string(),
            plan_reply(),
            regenerated.to_string(),
        ]));
        let app = app(llm.clone());
        let token = register(&app, "regen@example.com").await;

        let (_, started) = call(&app, Method::POST, "/api/intake/start", Some(&token), None).await;
        let session_id = started["sessionId"].as_str().unwrap().to_string();
        call(
            &app,
            Method::POST,
            &format!("/api/intake/{session_id}/message"),
            Some(&token),
            Some(json!({"message": "I want to move into UX research"})),
        )
        .await;
        let (status, generated) = call(
            &app,
            Method::POST,
            "/api/plans/generate",
            Some(&token),
            Some(json!({"sessionId": session_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!(
            "/api/plans/{}/regenerate",
            generated["planId"].as_str().unwrap()
        );

        // No body at all still reaches the handler and asks for a full regeneration.
        let (status, body) = call(&app, Method::PUT, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error"]["statusCode"], 501);

        let (status, _) = call(&app, Method::PUT, &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let (status, _) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"phaseNumber": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"phaseNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Phase 1 regenerated successfully");
        assert_eq!(body["phases"][0]["title"], "Foundations, revisited");
        assert_eq!(body["phases"][0]["phaseNumber"], 1);
        assert_eq!(body["phases"][1]["title"], "Portfolio");
        assert_eq!(llm.call_count(), 5);
    }

    #[tokio::test]
    async fn test_progress_without_plan_is_404() {
        let app = app(Arc::new(ScriptedLlm::new()));
        let token = register(&app, "empty@example.com").await;

        let (status, body) = call(&app, Method::GET, "/api/progress", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            "No progress found. Please generate a career plan first."
        );

        let (status, _) = call(&app, Method::GET, "/api/plans", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_agent_chat_round_trip() {
        let llm = Arc::new(ScriptedLlm::with_replies(["Start with one small win today."]));
        let app = app(llm);
        let token = register(&app, "chat@example.com").await;

        let (status, reply) = call(
            &app,
            Method::POST,
            "/api/agents/alex/chat",
            Some(&token),
            Some(json!({"message": "I feel stuck"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["conversationId"], "alex");
        assert_eq!(reply["message"]["role"], "assistant");

        let (status, convo) = call(
            &app,
            Method::GET,
            "/api/agents/alex/conversation?limit=abc",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(convo["agent"]["role"], "Career Coach");
        assert_eq!(convo["interactions"][0]["message"], "I feel stuck");
    }
}
