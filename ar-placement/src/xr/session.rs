use bevy::log::{info, warn};

use crate::xr::error::XrError;
use crate::xr::host::{ImmersiveHost, ReferenceSpaceKind, SessionRequest};

/// Session plus the spaces and hit-test source acquired for it. All of them
/// live for the whole session.
pub struct XrSessionContext<H: ImmersiveHost> {
    pub session: H::Session,
    pub local_space: H::Space,
    pub viewer_space: H::Space,
    pub hit_test_source: H::HitTestSource,
}

/// Request an immersive session and everything the frame loop needs.
///
/// Steps run strictly in order and nothing after a failing step runs. A
/// session that was granted is ended again if a later step fails.
pub async fn bootstrap_session<H: ImmersiveHost>(
    host: &H,
    request: &SessionRequest,
) -> Result<XrSessionContext<H>, XrError> {
    if !host.is_session_supported(request.mode).await? {
        return Err(XrError::Unsupported);
    }

    let session = host.request_session(request).await?;
    info!("✓ {} session granted", request.mode);

    match acquire_session_resources(host, session.clone()).await {
        Ok(context) => Ok(context),
        Err(err) => {
            warn!("Session setup failed ({err}), ending session");
            host.end_session(&session);
            Err(err)
        }
    }
}

async fn acquire_session_resources<H: ImmersiveHost>(
    host: &H,
    session: H::Session,
) -> Result<XrSessionContext<H>, XrError> {
    let local_space = host
        .request_reference_space(&session, ReferenceSpaceKind::Local)
        .await?;
    let viewer_space = host
        .request_reference_space(&session, ReferenceSpaceKind::Viewer)
        .await?;
    let hit_test_source = host.request_hit_test_source(&session, &viewer_space).await?;

    Ok(XrSessionContext {
        session,
        local_space,
        viewer_space,
        hit_test_source,
    })
}
