use super::ErrorBody;
use crate::{
    auth::AuthGateway,
    profile::UserProfile,
    roles::{paths, redirect_target_for, sections_for, Route},
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Extension,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize, Debug)]
pub struct Landing {
    route: String,
    user: UserProfile,
    sections: &'static [&'static str],
}

/// `/`: sends the session to its landing route, or to login.
pub async fn root(Extension(gateway): Extension<Arc<AuthGateway>>) -> Response {
    let Some(profile) = gateway.session().load().await else {
        return Redirect::to(paths::LOGIN).into_response();
    };

    match redirect_target_for(&profile) {
        // no area for this role; answering here avoids redirecting to ourselves
        Route::Root => Json(Landing {
            route: paths::ROOT.to_string(),
            sections: sections_for(&profile.rol),
            user: profile,
        })
        .into_response(),
        target => Redirect::to(target.path()).into_response(),
    }
}

/// Landing page of a role tree; the guard has attached the profile.
pub async fn landing(Extension(profile): Extension<UserProfile>) -> Json<Landing> {
    Json(Landing {
        route: redirect_target_for(&profile).path().to_string(),
        sections: sections_for(&profile.rol),
        user: profile,
    })
}

#[derive(Serialize, Debug)]
pub struct SectionPage {
    route: String,
    section: String,
    user: UserProfile,
}

pub async fn section(
    Extension(profile): Extension<UserProfile>,
    Path(section): Path<String>,
) -> Response {
    if !sections_for(&profile.rol).contains(&section.as_str()) {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new(format!("unknown section: {section}"))),
        )
            .into_response();
    }

    Json(SectionPage {
        route: format!("{}/{}", redirect_target_for(&profile).path(), section),
        section,
        user: profile,
    })
    .into_response()
}
