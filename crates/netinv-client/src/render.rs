//! Plain-text rendering of interface snapshots

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use netinv_api::{NetworkInterface, NetworkInterfaces};

/// Render a snapshot as a block of text, one section per interface
///
/// Empty address lists print as `null`, an empty MAC as `not found`. Every
/// section ends with a blank line.
#[must_use]
pub fn render(snapshot: &NetworkInterfaces, fetched_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "Network Interfaces ({}):\n",
        fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    for iface in &snapshot.interfaces {
        render_interface(&mut out, iface);
    }

    out
}

fn render_interface(out: &mut String, iface: &NetworkInterface) {
    // Writing into a String cannot fail
    let _ = writeln!(out, "Name: {}", iface.name);

    out.push_str("IP Addresses:\n");
    if iface.ip_addresses.is_empty() {
        out.push_str("\tnull\n");
    }
    for address in &iface.ip_addresses {
        let _ = writeln!(out, "\t{address}");
    }

    if iface.mac_address.is_empty() {
        out.push_str("MAC Address: not found\n");
    } else {
        let _ = writeln!(out, "MAC Address: {}", iface.mac_address);
    }

    let _ = writeln!(out, "MTU: {}", iface.mtu);
    let _ = writeln!(out, "Speed: {}", iface.speed);
    let _ = writeln!(out, "Duplex: {}", iface.duplex);
    let _ = writeln!(out, "Admin Status: {}", iface.admin_status);
    let _ = writeln!(out, "Operational Status: {}", iface.operational_status);
    out.push('\n');
}
