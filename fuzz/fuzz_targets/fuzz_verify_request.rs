#![no_main]

use libfuzzer_sys::fuzz_target;

use linkgate_types::Domain;
use linkgate_verification::{RevokeRequest, VerifyRequest};

fuzz_target!(|data: &[u8]| {
    // Untrusted request bodies as they arrive on `POST /verify` and
    // `DELETE /verify`.
    if let Ok(request) = serde_json::from_slice::<VerifyRequest>(data) {
        if let Some(domain) = request.domain.as_deref() {
            if let Ok(d) = Domain::sanitize(domain) {
                assert!(!d.as_str().is_empty() && d.as_str().len() <= 100);
            }
        }
    }
    let _ = serde_json::from_slice::<RevokeRequest>(data);
});
