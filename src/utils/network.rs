// src/utils/network.rs

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Private IPv4 ranges treated as local, as (network, prefix length).
const LOCAL_V4_NETWORKS: [(Ipv4Addr, u32); 2] = [
    (Ipv4Addr::new(10, 0, 0, 0), 8),
    (Ipv4Addr::new(192, 168, 0, 0), 16),
];

/// Whether a peer address counts as local: loopback, 10.0.0.0/8 or
/// 192.168.0.0/16. IPv4-mapped IPv6 addresses are checked as IPv4.
pub fn is_local_ip(ip: IpAddr) -> bool {
    match ip.to_canonical() {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || LOCAL_V4_NETWORKS
                    .iter()
                    .any(|(network, prefix)| in_network(v4, *network, *prefix))
        }
        IpAddr::V6(v6) => v6.is_loopback(),
    }
}

fn in_network(ip: Ipv4Addr, network: Ipv4Addr, prefix: u32) -> bool {
    let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    u32::from(ip) & mask == u32::from(network) & mask
}

/// Axum Middleware: Local Only.
///
/// Lets through requests whose TCP peer is local. Anyone else gets an empty
/// 404 so the route looks absent. Requires the router to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn local_only_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match peer {
        Some(ip) if is_local_ip(ip) => Ok(next.run(req).await),
        Some(ip) => {
            tracing::warn!(%ip, path = %req.uri().path(), "Rejected non-local caller");
            Err(StatusCode::NOT_FOUND)
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Rejected caller without peer address");
            Err(StatusCode::NOT_FOUND)
        }
    }
}
