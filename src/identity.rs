use md5::{Digest, Md5};

/// Derive a stable sys id from a canonical string.
///
/// The hex MD5 digest keeps ids identical across re-runs, which is what
/// makes person and asset creation idempotent: the same legacy source
/// always targets the same remote identity.
pub fn hashed_sys_id(guid: &str) -> String {
    hex::encode(Md5::digest(guid.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            hashed_sys_id("person.42@pro.europeana.eu"),
            hashed_sys_id("person.42@pro.europeana.eu")
        );
        assert_eq!(
            hashed_sys_id("person.42@pro.europeana.eu"),
            "efd8d11088b020d25a733ab8402136f7"
        );
    }

    #[test]
    fn test_hash_of_resolved_asset_url() {
        assert_eq!(
            hashed_sys_id("https://pro.europeana.eu/files/europeana-pro/hero.jpg"),
            "58bb284d7abc92641470e0f6029e5382"
        );
        assert_eq!(
            hashed_sys_id("https://pro.europeana.eu/files/some%20image.jpg"),
            "1fd302596e17c161eaa74fba798566e1"
        );
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(
            hashed_sys_id("person.42@pro.europeana.eu"),
            hashed_sys_id("person.43@pro.europeana.eu")
        );
    }
}
