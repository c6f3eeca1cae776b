//! Grandstream GXP provisioning XML.
//!
//! Settings are emitted as P-value elements inside `<config version="1">`.
//! Account slots 1-4 map to the P-value blocks below; other positions are
//! skipped.

use provision_types::{DeviceRecord, SipAccount};

use super::xml::element;
use super::{ConfigRenderer, RenderError};

/// P-values for one account slot.
struct AccountSlot {
    active: &'static str,
    name: &'static str,
    sip_server: &'static str,
    user_id: &'static str,
    auth_id: &'static str,
    password: &'static str,
    display_name: &'static str,
}

const ACCOUNT_SLOTS: [AccountSlot; 4] = [
    AccountSlot {
        active: "P271",
        name: "P270",
        sip_server: "P47",
        user_id: "P35",
        auth_id: "P36",
        password: "P34",
        display_name: "P3",
    },
    AccountSlot {
        active: "P401",
        name: "P417",
        sip_server: "P402",
        user_id: "P404",
        auth_id: "P405",
        password: "P406",
        display_name: "P407",
    },
    AccountSlot {
        active: "P501",
        name: "P517",
        sip_server: "P502",
        user_id: "P504",
        auth_id: "P505",
        password: "P506",
        display_name: "P507",
    },
    AccountSlot {
        active: "P601",
        name: "P617",
        sip_server: "P602",
        user_id: "P604",
        auth_id: "P605",
        password: "P606",
        display_name: "P607",
    },
];

const P_NTP_SERVER: &str = "P30";
const P_TIMEZONE: &str = "P64";

#[derive(Debug, Default, Clone, Copy)]
pub struct GrandstreamTemplate;

impl ConfigRenderer for GrandstreamTemplate {
    fn render(&self, device: &DeviceRecord) -> Result<String, RenderError> {
        let mut out = String::with_capacity(1024);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<gs_provision version=\"1\">\n");
        element(&mut out, 2, "mac", device.mac.as_deref().unwrap_or_default());
        out.push_str("  <config version=\"1\">\n");

        if let Some(ntp) = &device.ntp_server {
            element(&mut out, 4, P_NTP_SERVER, ntp);
        }
        if let Some(tz) = &device.timezone {
            element(&mut out, 4, P_TIMEZONE, tz);
        }

        let mut accounts: Vec<&SipAccount> = device.accounts.iter().collect();
        accounts.sort_by_key(|a| a.position);
        for account in accounts {
            let slot = usize::try_from(account.position)
                .ok()
                .and_then(|p| p.checked_sub(1))
                .and_then(|i| ACCOUNT_SLOTS.get(i));
            match slot {
                Some(slot) => render_account(&mut out, slot, account),
                None => tracing::warn!(
                    "Skipping account '{}' at unsupported position {} for {}",
                    account.name,
                    account.position,
                    device.model
                ),
            }
        }

        out.push_str("  </config>\n");
        out.push_str("</gs_provision>\n");
        Ok(out)
    }
}

fn render_account(out: &mut String, slot: &AccountSlot, account: &SipAccount) {
    element(out, 4, slot.active, "1");
    element(out, 4, slot.name, &account.name);
    element(out, 4, slot.sip_server, &account.sip_register);
    element(out, 4, slot.user_id, &account.sip_user);
    element(out, 4, slot.auth_id, &account.sip_auth);
    element(out, 4, slot.password, &account.sip_password);
    element(out, 4, slot.display_name, &account.sip_name);
}
