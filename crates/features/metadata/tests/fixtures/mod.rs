#![allow(dead_code)]

use bihub_domain::bundle::ImportBundle;
use bihub_domain::constants::DOMAIN_ID;
use bihub_metadata::{DomainImporter, DomainStorageError};
use parking_lot::Mutex;
use std::io::Cursor;

/// Wizard output with an embedded OLAP schema and a description stored outside the model.
pub const GENERATED_OLAP_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Generated" xmi.id="g1">
      <CWM:Description body="TRUE" name="AGILE_BI_GENERATED_SCHEMA" type="String" xmi.id="g2"/>
      <CWM:Description body="[]" name="olap_dimensions" type="String" xmi.id="g3"/>
      <CWMOLAP:Schema.cube>
        <CWMOLAP:Cube name="Orders" xmi.id="g4"/>
      </CWMOLAP:Schema.cube>
    </CWMOLAP:Schema>
    <CWM:Description body="Cube notes" name="comment" type="String" xmi.id="g5">
      <CWM:Description.modelElement>
        <CWMOLAP:Cube xmi.idref="g4"/>
      </CWM:Description.modelElement>
    </CWM:Description>
    <CWMOLAP:Schema name="Sales" xmi.id="s1">
      <CWM:Description body="Sales" name="description" type="String" xmi.id="s2"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;

/// Wizard output whose OLAP dimensions are child elements of the model, with the markers
/// stored as top-level descriptions that reference it.
pub const GENERATED_DIMENSION_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Generated" xmi.id="a1">
      <CWMOLAP:Schema.dimension>
        <CWMOLAP:Dimension name="Region" xmi.id="a2"/>
      </CWMOLAP:Schema.dimension>
    </CWMOLAP:Schema>
    <CWM:Description body="TRUE" name="AGILE_BI_GENERATED_SCHEMA" type="String" xmi.id="a3">
      <CWM:Description.modelElement>
        <CWMOLAP:Schema xmi.idref="a1"/>
      </CWM:Description.modelElement>
    </CWM:Description>
    <CWM:Description body="2.0" name="AGILE_BI_VERSION" type="String" xmi.id="a4">
      <CWM:Description.modelElement>
        <CWMOLAP:Schema xmi.idref="a1"/>
      </CWM:Description.modelElement>
    </CWM:Description>
    <CWMOLAP:Schema name="Sales" xmi.id="s1">
      <CWM:Description body="Sales" name="description" type="String" xmi.id="s2"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;

/// Wizard output without OLAP content; markers are carried as tagged values.
pub const GENERATED_TAGGED_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Orders" xmi.id="o1">
      <CWM:TaggedValue tag="AGILE_BI_GENERATED_SCHEMA" value="TRUE" xmi.id="o2"/>
      <CWM:TaggedValue tag="WIZARD_GENERATED_SCHEMA" value="TRUE" xmi.id="o3"/>
      <CWM:TaggedValue tag="AGILE_BI_VERSION" value="2.0" xmi.id="o4"/>
      <CWM:TaggedValue tag="owner" value="analytics" xmi.id="o5"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;

/// A hand-authored domain with nothing to strip.
pub const PLAIN_XMI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<XMI xmlns:CWM="org.omg.xmi.namespace.CWM" xmlns:CWMOLAP="org.omg.xmi.namespace.CWMOLAP" xmi.version="1.2">
  <XMI.content>
    <CWMOLAP:Schema name="Inventory" xmi.id="i1">
      <CWM:Description body="Stock levels" name="description" type="String" xmi.id="i2"/>
    </CWMOLAP:Schema>
  </XMI.content>
</XMI>
"#;

/// A bundle carrying `payload` under `domain_id`.
#[must_use]
pub fn metadata_bundle(domain_id: &str, payload: &str) -> ImportBundle {
    ImportBundle::builder()
        .name(domain_id)
        .input(Box::new(Cursor::new(payload.as_bytes().to_vec())))
        .property(DOMAIN_ID, domain_id)
        .overwrite(true)
        .build()
}

/// A locale bundle without its own domain id.
#[must_use]
pub fn locale_bundle(name: &str, payload: &str) -> ImportBundle {
    ImportBundle::builder().name(name).input(Box::new(Cursor::new(payload.as_bytes().to_vec()))).build()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Store { domain_id: String, xmi: String, overwrite: bool },
    Locale { domain_id: String, locale: String, properties: String, merge: bool },
}

/// An importer that records every call and replays a scripted failure.
#[derive(Debug, Default)]
pub struct RecordingImporter {
    pub calls: Mutex<Vec<Call>>,
    pub fail_with: Mutex<Option<fn() -> DomainStorageError>>,
}

impl RecordingImporter {
    #[must_use]
    pub fn failing(fail: fn() -> DomainStorageError) -> Self {
        let importer = Self::default();
        *importer.fail_with.lock() = Some(fail);
        importer
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn check(&self) -> Result<(), DomainStorageError> {
        let fail = *self.fail_with.lock();
        fail.map_or(Ok(()), |fail| Err(fail()))
    }
}

impl DomainImporter for RecordingImporter {
    fn store_domain(&self, xmi: &[u8], domain_id: &str, overwrite: bool) -> Result<(), DomainStorageError> {
        self.check()?;
        self.calls.lock().push(Call::Store {
            domain_id: domain_id.to_owned(),
            xmi: String::from_utf8_lossy(xmi).into_owned(),
            overwrite,
        });
        Ok(())
    }

    fn add_localization_file(
        &self,
        domain_id: &str,
        locale: &str,
        properties: &[u8],
        merge: bool,
    ) -> Result<(), DomainStorageError> {
        self.calls.lock().push(Call::Locale {
            domain_id: domain_id.to_owned(),
            locale: locale.to_owned(),
            properties: String::from_utf8_lossy(properties).into_owned(),
            merge,
        });
        Ok(())
    }
}
