// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group collection endpoint tests: CRUD, membership and ranking.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create, group_payload, send_json, track_payload, user_payload};

#[tokio::test]
async fn test_patch_unknown_group() {
    let (app, _state) = common::create_test_app();

    let (status, body) = send_json(
        &app,
        "PATCH",
        "/groups?id=nonexistent",
        Some(group_payload("Grupo", "id-0", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "update");
    assert_eq!(
        body["error"]["error"],
        "The id nonexistent does not match any group"
    );
}

#[tokio::test]
async fn test_patch_by_name_keeps_id() {
    let (app, _state) = common::create_test_app();
    let id = create(&app, "groups", group_payload("Grupo", "id-9", &[])).await;

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/groups?nombre=Grupo",
        Some(group_payload("Grupo Nuevo", "id-9", &[])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, "GET", &format!("/groups?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"][0]["nombre"], "Grupo Nuevo");
}

#[tokio::test]
async fn test_membership_and_ranking() {
    let (app, _state) = common::create_test_app();
    let short = create(&app, "tracks", track_payload("Corta", 5.0, 900.0)).await;
    let long = create(&app, "tracks", track_payload("Larga", 30.0, 100.0)).await;
    let ana = create(&app, "users", user_payload("Ana")).await;
    let luis = create(&app, "users", user_payload("Luis")).await;
    let group = create(&app, "groups", group_payload("Grupo", &ana, &[])).await;

    for user in [&ana, &luis] {
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/groups/members?id={group}&usuario={user}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let complete = |user: String, track: String| {
        let app = app.clone();
        async move {
            let (status, body) = send_json(
                &app,
                "POST",
                &format!("/users/completions?id={user}"),
                Some(json!({ "ruta": track, "fecha": "2024-05-01" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }
    };
    complete(ana.clone(), short.clone()).await;
    complete(luis.clone(), long.clone()).await;

    // Completions re-rank by distance
    let (_, body) = send_json(&app, "GET", &format!("/groups?id={group}"), None).await;
    assert_eq!(body["response"][0]["ranking"], json!([luis.clone(), ana.clone()]));
    assert!(body["response"][0]["estadisticas"]["anio"]["km"].is_number());

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/groups/ranking?id={group}&por=desnivel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], json!([ana.clone(), luis.clone()]));

    let (status, body) = send_json(
        &app,
        "DELETE",
        &format!("/groups/members?id={group}&usuario={luis}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], json!([ana.clone()]));

    let (_, body) = send_json(&app, "GET", &format!("/users?id={luis}"), None).await;
    assert_eq!(body["response"][0]["grupos"], json!([]));
}

#[tokio::test]
async fn test_membership_requires_keys() {
    let (app, _state) = common::create_test_app();
    let group = create(&app, "groups", group_payload("Grupo", "id-9", &[])).await;

    let (status, body) =
        send_json(&app, "POST", &format!("/groups/members?id={group}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["error"], "A name or an id must be provided");

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/groups/members?id={group}&usuario=id-404"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["error"], "The id id-404 does not match any user");
}

#[tokio::test]
async fn test_populated_group_owner() {
    let (app, _state) = common::create_test_app();
    let ana = create(&app, "users", user_payload("Ana")).await;
    create(&app, "groups", group_payload("Grupo", &ana, &[ana.as_str()])).await;

    let (status, body) = send_json(&app, "GET", "/groups?populate=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"][0]["propietarioID"]["nombre"], "Ana");
    assert_eq!(body["response"][0]["miembrosID"][0]["id"], ana.as_str());
}
