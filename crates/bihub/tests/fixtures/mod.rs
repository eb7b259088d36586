#![allow(dead_code)]

use bihub::domain::config::{CipherKind, PlatformConfig};

/// Default config with a test secret and the given cipher.
#[must_use]
pub fn config(cipher: CipherKind) -> PlatformConfig {
    let mut config = PlatformConfig::default();
    config.encryption.secret = "integration-secret".to_owned();
    config.encryption.salt = "integration-salt".to_owned();
    config.encryption.cipher = cipher;
    config
}

pub const XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Orders" xmi.id="o1">
      <CWM:Description body="TRUE" name="AGILE_BI_GENERATED_SCHEMA" type="String" xmi.id="o2"/>
      <CWM:Description body="Orders" name="description" type="String" xmi.id="o3"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;
