#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on unwind and access is serialized, since tests
/// run in parallel against one process environment.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// APT export for program 1201: WASP-1 b observed with NIRSpec BOTS and
/// HAT-P-26 b with MIRI LRS.
pub const APT_1201: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<JwstProposal xmlns="http://www.stsci.edu/JWST/APT"
    xmlns:nsbots="http://www.stsci.edu/JWST/APT/Template/NirspecBrightObjectTimeSeries"
    xmlns:mlrs="http://www.stsci.edu/JWST/APT/Template/MiriLRS">
  <ProposalInformation>
    <ProposalPhase>Proposal</ProposalPhase>
    <Title>Transiting exoplanet atmospheres</Title>
    <ProposalID>1201</ProposalID>
    <ProprietaryPeriod>12</ProprietaryPeriod>
    <Cycle>1</Cycle>
    <PrincipalInvestigator>
      <InvestigatorAddress>
        <LastName>Lovelace</LastName>
      </InvestigatorAddress>
    </PrincipalInvestigator>
  </ProposalInformation>
  <Targets>
    <Target>
      <Number>1</Number>
      <TargetName>WASP-1 b</TargetName>
      <EquatorialCoordinates Value="00 20 40.0770 +31 59 23.79"/>
    </Target>
    <Target>
      <Number>2</Number>
      <TargetName>HAT-P-26 b</TargetName>
      <EquatorialCoordinates Value="14 12 37.5392 +04 03 35.96"/>
    </Target>
  </Targets>
  <DataRequests>
    <ObservationGroup>
      <Label>Transits</Label>
      <Observation>
        <Number>1</Number>
        <TargetID>1 WASP-1 b</TargetID>
        <Instrument>NIRSPEC</Instrument>
        <SpecialRequirements><TimeSeriesObservation/></SpecialRequirements>
        <Template>
          <nsbots:NirspecBrightObjectTimeSeries>
            <nsbots:AcqGroups>2</nsbots:AcqGroups>
            <nsbots:Subarray>SUB80</nsbots:Subarray>
            <nsbots:ReadoutPattern>NRSRAPID</nsbots:ReadoutPattern>
            <nsbots:Groups>4</nsbots:Groups>
            <nsbots:Grating>G395H</nsbots:Grating>
          </nsbots:NirspecBrightObjectTimeSeries>
        </Template>
      </Observation>
      <Observation>
        <Number>2</Number>
        <TargetID>2 HAT-P-26 b</TargetID>
        <Instrument>MIRI</Instrument>
        <Template>
          <mlrs:MiriLRS>
            <mlrs:Subarray>SLITLESSPRISM</mlrs:Subarray>
            <mlrs:ReadoutPattern>FASTR1</mlrs:ReadoutPattern>
            <mlrs:Groups>60</mlrs:Groups>
          </mlrs:MiriLRS>
        </Template>
      </Observation>
    </ObservationGroup>
  </DataRequests>
</JwstProposal>"#;

/// Visit report for program 1201.
pub const VSR_1201: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<report observatory="JWST" id="1201">
  <title>Transiting exoplanet atmospheres</title>
  <visit observation="1" visit="1">
    <status>Scheduled</status>
    <target>WASP-1</target>
    <hours>7.51</hours>
    <planWindow>X</planWindow>
    <startTime>15-JAN-2024</startTime>
  </visit>
  <visit observation="2" visit="1">
    <status>Archived</status>
    <target>HAT-P-26</target>
    <hours>9.2</hours>
    <startTime>Jun 21, 2022 02:41:18</startTime>
  </visit>
</report>"#;

/// Reference rows matching the summaries derived from [`APT_1201`] and
/// [`VSR_1201`], except for a deliberately different HAT-P-26 subarray.
pub const REFERENCE_CSV: &str = "star_name,planet_letter,program,groups,readout_pattern,subarray,hours,pl_orbper\n\
WASP-1,b,1201,4,NRSRAPID,SUB80,7.51,2.52\n\
HAT-P-26,b,1201,60,FASTR1,SUBPRISM,9.2,4.23\n";

/// Writes `content` to `<work_dir>/PPS/<APT|VSR>/<id>_<APT|VSR>.xml`.
pub fn write_document(work_dir: &Path, kind: &str, program_id: u32, content: &str) {
    let dir = work_dir.join("PPS").join(kind);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}_{}.xml", program_id, kind)), content).unwrap();
}
