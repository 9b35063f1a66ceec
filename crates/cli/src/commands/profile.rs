//! Store profile commands.

use clap::Args;
use vendor_desk_admin::ConsoleError;
use vendor_desk_admin::ConsoleState;
use vendor_desk_core::types::VendorProfile;

/// Fields to change. Omitted fields keep their current value; an empty
/// string clears an optional field.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileChanges {
    #[arg(long)]
    pub store_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub logo_url: Option<String>,

    #[arg(long)]
    pub banner_url: Option<String>,

    #[arg(long)]
    pub payout_email: Option<String>,
}

impl ProfileChanges {
    fn apply(self, profile: &mut VendorProfile) {
        if let Some(name) = self.store_name {
            profile.store_name = name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        set_optional(&mut profile.phone, self.phone);
        set_optional(&mut profile.address, self.address);
        set_optional(&mut profile.logo_url, self.logo_url);
        set_optional(&mut profile.banner_url, self.banner_url);
        set_optional(&mut profile.payout_email, self.payout_email);
    }
}

fn set_optional(field: &mut Option<String>, change: Option<String>) {
    if let Some(value) = change {
        *field = Some(value).filter(|v| !v.trim().is_empty());
    }
}

pub async fn show(state: &ConsoleState, refresh: bool) -> Result<(), ConsoleError> {
    let profile = if refresh {
        state.refresh_profile().await?
    } else {
        state.profile().await
    };
    print_profile(&profile);
    Ok(())
}

/// Apply `changes` to the current profile, push it and mirror it locally.
pub async fn set(state: &ConsoleState, changes: ProfileChanges) -> Result<(), ConsoleError> {
    let mut profile = state.profile().await;
    changes.apply(&mut profile);
    let saved = state.save_profile(profile).await?;
    print_profile(&saved);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_profile(profile: &VendorProfile) {
    println!("Store name:   {}", profile.store_name);
    println!("Email:        {}", profile.email);
    println!("Phone:        {}", profile.phone.as_deref().unwrap_or("-"));
    println!("Address:      {}", profile.address.as_deref().unwrap_or("-"));
    println!("Logo:         {}", profile.logo_url.as_deref().unwrap_or("-"));
    println!("Banner:       {}", profile.banner_url.as_deref().unwrap_or("-"));
    println!("Payout email: {}", profile.effective_payout_email());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_omitted_fields() {
        let mut profile = VendorProfile {
            store_name: "Old".to_string(),
            email: "old@shop.test".to_string(),
            phone: Some("555".to_string()),
            ..VendorProfile::default()
        };
        ProfileChanges {
            store_name: Some("New".to_string()),
            phone: Some(String::new()),
            ..ProfileChanges::default()
        }
        .apply(&mut profile);

        assert_eq!(profile.store_name, "New");
        assert_eq!(profile.email, "old@shop.test");
        assert_eq!(profile.phone, None);
    }
}
