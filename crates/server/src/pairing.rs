use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use shared::domain::PairingPayload;

/// Best guess at the address pads on the LAN should dial. Connecting a UDP
/// socket sends nothing; it only selects the outbound interface.
pub fn detect_lan_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

pub fn pairing_payload(advertise_host: Option<&str>, bind_ip: IpAddr, port: u16) -> PairingPayload {
    let host = match advertise_host {
        Some(host) if !host.trim().is_empty() => host.trim().to_string(),
        _ if !bind_ip.is_unspecified() => bind_ip.to_string(),
        _ => detect_lan_ip()
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .to_string(),
    };
    PairingPayload { host, port }
}
