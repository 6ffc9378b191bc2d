//! Sans-IO authorization key generation.
//!
//! Three strictly sequential rounds produce a 2048-bit shared secret:
//! nonce exchange and PQ factoring, RSA-protected DH parameter request,
//! and the DH answer itself. The step functions below are pure given
//! their injected randomness; [`Negotiator`] drives them as an explicit
//! state machine over raw plaintext message bodies.
//!
//! ```text
//! let mut neg = Negotiator::new();
//! let out = neg.begin();
//! // send out, receive resp
//! match neg.step(&resp)? {
//!     StepResult::Send(next) => { /* keep going */ }
//!     StepResult::Done(finished) => { /* finished.auth_key is ready */ }
//! }
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::{BigUint, ToBigUint};
use sha1::{Digest, Sha1};
use tgcore_crypto::{aes, factorize, generate_key_data_from_nonce, rsa, AuthKey};
use tgcore_tl::{enums, functions, types, Cursor, Deserializable, Serializable};

// ─── Error ───────────────────────────────────────────────────────────────────

/// Errors that can occur during auth key generation. Any of them aborts
/// the exchange; the caller restarts with a fresh client nonce.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    InvalidNonce { got: [u8; 16], expected: [u8; 16] },
    InvalidServerNonce { got: [u8; 16], expected: [u8; 16] },
    InvalidPqSize { size: usize },
    FactorizeFailed { pq: u64 },
    UnknownFingerprints { fingerprints: Vec<i64> },
    DhParamsFail,
    EncryptedResponseNotPadded { len: usize },
    InvalidDhInnerData { error: tgcore_tl::deserialize::Error },
    InvalidAnswerHash { got: [u8; 20], expected: [u8; 20] },
    GParameterOutOfRange { value: BigUint, low: BigUint, high: BigUint },
    InvalidNewNonceHash { got: [u8; 16], expected: [u8; 16] },
    DhGenRetry,
    DhGenFail,
    /// A server response failed to decode.
    Decode(tgcore_tl::deserialize::Error),
    /// [`Negotiator::step`] was called out of sequence.
    OutOfOrder,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNonce { got, expected } => {
                write!(f, "nonce mismatch: got {got:?}, expected {expected:?}")
            }
            Self::InvalidServerNonce { got, expected } => {
                write!(f, "server_nonce mismatch: got {got:?}, expected {expected:?}")
            }
            Self::InvalidPqSize { size } => write!(f, "pq size {size} invalid (expected 8)"),
            Self::FactorizeFailed { pq } => write!(f, "could not factor pq {pq}"),
            Self::UnknownFingerprints { fingerprints } => {
                write!(f, "no known fingerprint in {fingerprints:?}")
            }
            Self::DhParamsFail => write!(f, "server returned DH params failure"),
            Self::EncryptedResponseNotPadded { len } => {
                write!(f, "encrypted answer len {len} is not 16-byte aligned")
            }
            Self::InvalidDhInnerData { error } => {
                write!(f, "DH inner data deserialization error: {error}")
            }
            Self::InvalidAnswerHash { .. } => write!(f, "answer hash mismatch"),
            Self::GParameterOutOfRange { value, low, high } => {
                write!(f, "g parameter {value} not in range ({low}, {high})")
            }
            Self::InvalidNewNonceHash { .. } => write!(f, "new nonce hash mismatch"),
            Self::DhGenRetry => write!(f, "DH gen retry requested"),
            Self::DhGenFail => write!(f, "DH gen failed"),
            Self::Decode(e) => write!(f, "response decode error: {e}"),
            Self::OutOfOrder => write!(f, "handshake step out of order"),
        }
    }
}

// ─── Step state ──────────────────────────────────────────────────────────────

/// State after round 1 was sent.
pub struct Step1 {
    nonce: [u8; 16],
}

/// State after round 2 was sent.
#[derive(Debug)]
pub struct Step2 {
    nonce: [u8; 16],
    server_nonce: [u8; 16],
    new_nonce: [u8; 32],
}

/// State after round 3 was sent. Retains the DH parameters so a
/// `dh_gen_retry` can re-enter round 3 without another server round trip.
pub struct Step3 {
    nonce: [u8; 16],
    server_nonce: [u8; 16],
    new_nonce: [u8; 32],
    g: BigUint,
    dh_prime: BigUint,
    g_a: BigUint,
    tmp_aes_key: [u8; 32],
    tmp_aes_iv: [u8; 32],
    gab: BigUint,
    time_offset: i32,
    retry_id: i64,
}

/// The output of a successful handshake.
#[derive(Clone, Debug, PartialEq)]
pub struct Finished {
    /// The 256-byte authorization key (big-endian DH shared secret).
    pub auth_key: [u8; 256],
    /// The 64-bit key identifier derived from the key.
    pub auth_id: u64,
    /// Clock skew in seconds relative to the server.
    pub time_offset: i32,
    /// Initial server salt, `new_nonce[0..8] XOR server_nonce[0..8]`.
    pub first_salt: i64,
}

// ─── Round 1: req_pq ─────────────────────────────────────────────────────────

/// Generate a `req_pq` request with a fresh client nonce.
pub fn step1() -> (functions::ReqPq, Step1) {
    let mut buf = [0u8; 16];
    getrandom::getrandom(&mut buf).expect("getrandom failed");
    do_step1(&buf)
}

fn do_step1(random: &[u8; 16]) -> (functions::ReqPq, Step1) {
    let nonce = *random;
    (functions::ReqPq { nonce }, Step1 { nonce })
}

// ─── Round 2: req_DH_params ──────────────────────────────────────────────────

/// Process `resPQ` and generate `req_DH_params`.
pub fn step2(
    data: Step1,
    response: enums::ResPq,
) -> Result<(functions::ReqDhParams, Step2), Error> {
    let mut rnd = [0u8; 288]; // 32 for new_nonce + 256 for RSA padding
    getrandom::getrandom(&mut rnd).expect("getrandom failed");
    do_step2(data, response, &rnd)
}

fn do_step2(
    data: Step1,
    response: enums::ResPq,
    random: &[u8; 288],
) -> Result<(functions::ReqDhParams, Step2), Error> {
    let Step1 { nonce } = data;
    let enums::ResPq::ResPq(res_pq) = response;

    check_nonce(&res_pq.nonce, &nonce)?;

    if res_pq.pq.len() != 8 {
        return Err(Error::InvalidPqSize { size: res_pq.pq.len() });
    }

    let pq = u64::from_be_bytes(res_pq.pq.as_slice().try_into().unwrap());
    let (p, q) = factorize(pq).map_err(|e| Error::FactorizeFailed { pq: e.pq })?;

    let mut new_nonce = [0u8; 32];
    new_nonce.copy_from_slice(&random[..32]);
    let rsa_random: &[u8; 256] = random[32..].try_into().unwrap();

    let p_bytes = trim_be(p);
    let q_bytes = trim_be(q);

    let pq_inner = enums::PQInnerData::PQInnerData(types::PQInnerData {
        pq: res_pq.pq.clone(),
        p: p_bytes.clone(),
        q: q_bytes.clone(),
        nonce,
        server_nonce: res_pq.server_nonce,
        new_nonce,
    })
    .to_bytes();

    let fingerprint = res_pq
        .server_public_key_fingerprints
        .iter()
        .copied()
        .find(|&fp| key_for_fingerprint(fp).is_some())
        .ok_or_else(|| Error::UnknownFingerprints {
            fingerprints: res_pq.server_public_key_fingerprints.clone(),
        })?;

    let key = key_for_fingerprint(fingerprint).unwrap();
    let ciphertext = rsa::encrypt_hashed(&pq_inner, &key, rsa_random);

    Ok((
        functions::ReqDhParams {
            nonce,
            server_nonce: res_pq.server_nonce,
            p: p_bytes,
            q: q_bytes,
            public_key_fingerprint: fingerprint,
            encrypted_data: ciphertext,
        },
        Step2 { nonce, server_nonce: res_pq.server_nonce, new_nonce },
    ))
}

fn trim_be(v: u64) -> Vec<u8> {
    let b = v.to_be_bytes();
    let skip = b.iter().position(|&x| x != 0).unwrap_or(7);
    b[skip..].to_vec()
}

// ─── Round 3: set_client_DH_params ───────────────────────────────────────────

/// Process `server_DH_params` and generate `set_client_DH_params`.
pub fn step3(
    data: Step2,
    response: enums::ServerDhParams,
) -> Result<(functions::SetClientDhParams, Step3), Error> {
    let mut rnd = [0u8; 272]; // 256 for the DH secret + 16 for padding
    getrandom::getrandom(&mut rnd).expect("getrandom failed");
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i32;
    do_step3(data, response, &rnd, now)
}

fn do_step3(
    data: Step2,
    response: enums::ServerDhParams,
    random: &[u8; 272],
    now: i32,
) -> Result<(functions::SetClientDhParams, Step3), Error> {
    let Step2 { nonce, server_nonce, new_nonce } = data;

    let mut server_dh_ok = match response {
        enums::ServerDhParams::Fail(f) => {
            check_nonce(&f.nonce, &nonce)?;
            check_server_nonce(&f.server_nonce, &server_nonce)?;
            // The failure message still authenticates itself with a hash
            // of our new_nonce.
            let digest: [u8; 20] = {
                let mut sha = Sha1::new();
                sha.update(new_nonce);
                sha.finalize().into()
            };
            let mut expected = [0u8; 16];
            expected.copy_from_slice(&digest[4..]);
            check_new_nonce_hash(&f.new_nonce_hash, &expected)?;
            return Err(Error::DhParamsFail);
        }
        enums::ServerDhParams::Ok(x) => x,
    };

    check_nonce(&server_dh_ok.nonce, &nonce)?;
    check_server_nonce(&server_dh_ok.server_nonce, &server_nonce)?;

    if server_dh_ok.encrypted_answer.len() % 16 != 0 {
        return Err(Error::EncryptedResponseNotPadded {
            len: server_dh_ok.encrypted_answer.len(),
        });
    }

    let (tmp_aes_key, tmp_aes_iv) = generate_key_data_from_nonce(&server_nonce, &new_nonce);
    aes::ige_decrypt(&mut server_dh_ok.encrypted_answer, &tmp_aes_key, &tmp_aes_iv);
    let plain = server_dh_ok.encrypted_answer;

    let got_hash: [u8; 20] = plain[..20].try_into().unwrap();
    let mut cursor = Cursor::from_slice(&plain[20..]);

    let inner = match enums::ServerDhInnerData::deserialize(&mut cursor) {
        Ok(enums::ServerDhInnerData::ServerDhInnerData(x)) => x,
        Err(e) => return Err(Error::InvalidDhInnerData { error: e }),
    };

    let expected_hash: [u8; 20] = {
        let mut sha = Sha1::new();
        sha.update(&plain[20..20 + cursor.pos()]);
        sha.finalize().into()
    };
    if got_hash != expected_hash {
        return Err(Error::InvalidAnswerHash { got: got_hash, expected: expected_hash });
    }

    check_nonce(&inner.nonce, &nonce)?;
    check_server_nonce(&inner.server_nonce, &server_nonce)?;

    let dh_prime = BigUint::from_bytes_be(&inner.dh_prime);
    let g = inner.g.to_biguint().unwrap();
    let g_a = BigUint::from_bytes_be(&inner.g_a);
    let time_offset = inner.server_time - now;

    let b = BigUint::from_bytes_be(&random[..256]);
    let g_b = g.modpow(&b, &dh_prime);
    let gab = g_a.modpow(&b, &dh_prime);

    validate_dh_values(&g, &g_a, &g_b, &dh_prime)?;

    let encrypted_data = encrypt_client_dh_inner(
        &ClientDhParts {
            nonce,
            server_nonce,
            retry_id: 0,
            g_b: &g_b,
            tmp_aes_key: &tmp_aes_key,
            tmp_aes_iv: &tmp_aes_iv,
        },
        &random[256..],
    );

    Ok((
        functions::SetClientDhParams { nonce, server_nonce, encrypted_data },
        Step3 {
            nonce,
            server_nonce,
            new_nonce,
            g,
            dh_prime,
            g_a,
            tmp_aes_key,
            tmp_aes_iv,
            gab,
            time_offset,
            retry_id: 0,
        },
    ))
}

/// Re-enter round 3 after `dh_gen_retry`: pick a fresh secret and resend
/// with an incremented `retry_id`.
pub fn retry_step3(data: Step3) -> Result<(functions::SetClientDhParams, Step3), Error> {
    let mut rnd = [0u8; 272];
    getrandom::getrandom(&mut rnd).expect("getrandom failed");
    do_retry_step3(data, &rnd)
}

fn do_retry_step3(
    data: Step3,
    random: &[u8; 272],
) -> Result<(functions::SetClientDhParams, Step3), Error> {
    let b = BigUint::from_bytes_be(&random[..256]);
    let g_b = data.g.modpow(&b, &data.dh_prime);
    let gab = data.g_a.modpow(&b, &data.dh_prime);

    validate_dh_values(&data.g, &data.g_a, &g_b, &data.dh_prime)?;

    let retry_id = data.retry_id + 1;
    let encrypted_data = encrypt_client_dh_inner(
        &ClientDhParts {
            nonce: data.nonce,
            server_nonce: data.server_nonce,
            retry_id,
            g_b: &g_b,
            tmp_aes_key: &data.tmp_aes_key,
            tmp_aes_iv: &data.tmp_aes_iv,
        },
        &random[256..],
    );

    Ok((
        functions::SetClientDhParams {
            nonce: data.nonce,
            server_nonce: data.server_nonce,
            encrypted_data,
        },
        Step3 { gab, retry_id, ..data },
    ))
}

struct ClientDhParts<'a> {
    nonce: [u8; 16],
    server_nonce: [u8; 16],
    retry_id: i64,
    g_b: &'a BigUint,
    tmp_aes_key: &'a [u8; 32],
    tmp_aes_iv: &'a [u8; 32],
}

fn encrypt_client_dh_inner(parts: &ClientDhParts<'_>, padding: &[u8]) -> Vec<u8> {
    let inner = enums::ClientDhInnerData::ClientDhInnerData(types::ClientDhInnerData {
        nonce: parts.nonce,
        server_nonce: parts.server_nonce,
        retry_id: parts.retry_id,
        g_b: parts.g_b.to_bytes_be(),
    })
    .to_bytes();

    let digest: [u8; 20] = {
        let mut sha = Sha1::new();
        sha.update(&inner);
        sha.finalize().into()
    };

    let pad_len = (16 - (20 + inner.len()) % 16) % 16;
    let mut hashed = Vec::with_capacity(20 + inner.len() + pad_len);
    hashed.extend_from_slice(&digest);
    hashed.extend_from_slice(&inner);
    hashed.extend_from_slice(&padding[..pad_len]);

    aes::ige_encrypt(&mut hashed, parts.tmp_aes_key, parts.tmp_aes_iv);
    hashed
}

fn validate_dh_values(
    g: &BigUint,
    g_a: &BigUint,
    g_b: &BigUint,
    dh_prime: &BigUint,
) -> Result<(), Error> {
    let one = BigUint::from(1u32);
    check_in_range(g, &one, &(dh_prime - &one))?;
    check_in_range(g_a, &one, &(dh_prime - &one))?;
    check_in_range(g_b, &one, &(dh_prime - &one))?;
    let safety = one << (2048 - 64);
    check_in_range(g_a, &safety, &(dh_prime - &safety))?;
    check_in_range(g_b, &safety, &(dh_prime - &safety))?;
    Ok(())
}

// ─── Finish ──────────────────────────────────────────────────────────────────

/// Verify the server's DH answer. Borrows the round-3 state so the caller
/// can re-enter round 3 via [`retry_step3`] when the answer is a retry.
pub fn finish(data: &Step3, response: enums::SetClientDhParamsAnswer) -> Result<Finished, Error> {
    struct DhAnswer {
        nonce: [u8; 16],
        server_nonce: [u8; 16],
        hash: [u8; 16],
        num: u8,
    }

    let answer = match response {
        enums::SetClientDhParamsAnswer::DhGenOk(x) => DhAnswer {
            nonce: x.nonce,
            server_nonce: x.server_nonce,
            hash: x.new_nonce_hash1,
            num: 1,
        },
        enums::SetClientDhParamsAnswer::DhGenRetry(x) => DhAnswer {
            nonce: x.nonce,
            server_nonce: x.server_nonce,
            hash: x.new_nonce_hash2,
            num: 2,
        },
        enums::SetClientDhParamsAnswer::DhGenFail(x) => DhAnswer {
            nonce: x.nonce,
            server_nonce: x.server_nonce,
            hash: x.new_nonce_hash3,
            num: 3,
        },
    };

    check_nonce(&answer.nonce, &data.nonce)?;
    check_server_nonce(&answer.server_nonce, &data.server_nonce)?;

    let mut key_bytes = [0u8; 256];
    let gab_bytes = data.gab.to_bytes_be();
    key_bytes[256 - gab_bytes.len()..].copy_from_slice(&gab_bytes);

    let auth_key = AuthKey::from_bytes(key_bytes);
    let expected_hash = auth_key.calc_new_nonce_hash(&data.new_nonce, answer.num);
    check_new_nonce_hash(&answer.hash, &expected_hash)?;

    match answer.num {
        1 => {
            let mut salt = [0u8; 8];
            for ((dst, a), b) in salt.iter_mut().zip(&data.new_nonce[..8]).zip(&data.server_nonce[..8]) {
                *dst = a ^ b;
            }
            Ok(Finished {
                auth_key: auth_key.to_bytes(),
                auth_id: auth_key.auth_id(),
                time_offset: data.time_offset,
                first_salt: i64::from_le_bytes(salt),
            })
        }
        2 => Err(Error::DhGenRetry),
        _ => Err(Error::DhGenFail),
    }
}

// ─── Negotiator state machine ────────────────────────────────────────────────

/// What the caller should do after feeding a server response in.
pub enum StepResult {
    /// Send this body as the next plaintext message.
    Send(Vec<u8>),
    /// The handshake completed.
    Done(Finished),
}

enum State {
    Idle,
    PqRequested(Step1),
    DhRequested(Step2),
    DhGenerationRequested(Step3),
    Success,
    Failed,
}

/// Drives the three handshake rounds over raw message bodies.
///
/// Any error is terminal for this instance; call [`Negotiator::begin`]
/// again to restart with a fresh client nonce.
pub struct Negotiator {
    state: State,
}

impl Negotiator {
    /// A negotiator with no round in flight.
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Produce the round-1 request body. May be called again after an
    /// error to restart from scratch.
    pub fn begin(&mut self) -> Vec<u8> {
        let (req, s1) = step1();
        self.state = State::PqRequested(s1);
        req.to_bytes()
    }

    /// Feed the next server response body in.
    pub fn step(&mut self, incoming: &[u8]) -> Result<StepResult, Error> {
        match std::mem::replace(&mut self.state, State::Failed) {
            State::PqRequested(s1) => {
                let resp = enums::ResPq::from_bytes(incoming).map_err(Error::Decode)?;
                let (req, s2) = step2(s1, resp)?;
                self.state = State::DhRequested(s2);
                Ok(StepResult::Send(req.to_bytes()))
            }
            State::DhRequested(s2) => {
                let resp = enums::ServerDhParams::from_bytes(incoming).map_err(Error::Decode)?;
                let (req, s3) = step3(s2, resp)?;
                self.state = State::DhGenerationRequested(s3);
                Ok(StepResult::Send(req.to_bytes()))
            }
            State::DhGenerationRequested(s3) => {
                let resp =
                    enums::SetClientDhParamsAnswer::from_bytes(incoming).map_err(Error::Decode)?;
                match finish(&s3, resp) {
                    Ok(done) => {
                        self.state = State::Success;
                        Ok(StepResult::Done(done))
                    }
                    Err(Error::DhGenRetry) => {
                        let (req, s3) = retry_step3(s3)?;
                        self.state = State::DhGenerationRequested(s3);
                        Ok(StepResult::Send(req.to_bytes()))
                    }
                    Err(e) => Err(e),
                }
            }
            State::Idle | State::Success | State::Failed => Err(Error::OutOfOrder),
        }
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn check_nonce(got: &[u8; 16], expected: &[u8; 16]) -> Result<(), Error> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::InvalidNonce { got: *got, expected: *expected })
    }
}

fn check_server_nonce(got: &[u8; 16], expected: &[u8; 16]) -> Result<(), Error> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::InvalidServerNonce { got: *got, expected: *expected })
    }
}

fn check_new_nonce_hash(got: &[u8; 16], expected: &[u8; 16]) -> Result<(), Error> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::InvalidNewNonceHash { got: *got, expected: *expected })
    }
}

fn check_in_range(val: &BigUint, lo: &BigUint, hi: &BigUint) -> Result<(), Error> {
    if lo < val && val < hi {
        Ok(())
    } else {
        Err(Error::GParameterOutOfRange {
            value: val.clone(),
            low: lo.clone(),
            high: hi.clone(),
        })
    }
}

/// The embedded server public keys: the production key and the test-DC
/// key. Decimal `(n, e)` pairs.
const SERVER_KEYS: [(&str, &str); 2] = [
    (
        "29379598170669337022986177149456128565388431120058863768162556424047512191330847455146576344487764408661701890505066208632169112269581063774293102577308490531282748465986139880977280302242772832972539403531316010870401287642763009136156734339538042419388722777357134487746169093539093850251243897188928735903389451772730245253062963384108812842079887538976360465290946139638691491496062099570836476454855996319192747663615955633778034897140982517446405334423701359108810182097749467210509584293428076654573384828809574217079944388301239431309115013843331317877374435868468779972014486325557807783825502498215169806323",
        "65537",
    ),
    (
        "25342889448840415564971689590713473206898847759084779052582026594546022463853940585885215951168491965708222649399180603818074200620463776135424884632162512403163793083921641631564740959529419359595852941166848940585952337613333022396096584117954892216031229237302943701877588456738335398602461675225081791820393153757504952636234951323237820036543581047826906120927972487366805292115792231423684261262330394324750785450942589751755390156647751460719351439969059949569615302809050721500330239005077889855323917509948255722081644689442127297605422579707142646660768825302832201908302295573257427896031830742328565032949",
        "65537",
    ),
];

/// Look up an embedded key by the fingerprint a server advertised.
pub fn key_for_fingerprint(fp: i64) -> Option<rsa::Key> {
    SERVER_KEYS
        .iter()
        .filter_map(|(n, e)| rsa::Key::new(n, e))
        .find(|key| key.fingerprint() == fp)
}

/// The fingerprints of every embedded key, in table order.
pub fn known_key_fingerprints() -> Vec<i64> {
    SERVER_KEYS
        .iter()
        .filter_map(|(n, e)| rsa::Key::new(n, e))
        .map(|key| key.fingerprint())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_NONCE: [u8; 16] = [0x3E, 0x05, 0x49, 0x82, 0x8C, 0xCA, 0x27, 0xE9, 0x66, 0xB3, 0x01, 0xA4, 0x8F, 0xEC, 0xE2, 0xF4];
    const SERVER_NONCE: [u8; 16] = [0xA5, 0xCF, 0x4D, 0x33, 0xF4, 0xA1, 0x1E, 0xA8, 0x77, 0xBA, 0x4A, 0xA5, 0x73, 0x90, 0x73, 0x30];
    const PQ: u64 = 0x17ED48941A08F981;

    fn sample_res_pq() -> enums::ResPq {
        enums::ResPq::ResPq(types::ResPq {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            pq: PQ.to_be_bytes().to_vec(),
            server_public_key_fingerprints: known_key_fingerprints(),
        })
    }

    fn step2_random() -> [u8; 288] {
        core::array::from_fn(|i| (i * 11 + 3) as u8)
    }

    #[test]
    fn pq_round_factors_sample_challenge() {
        let (_, s1) = do_step1(&CLIENT_NONCE);
        let (req, _) = do_step2(s1, sample_res_pq(), &step2_random()).unwrap();

        assert_eq!(req.nonce, CLIENT_NONCE);
        assert_eq!(req.server_nonce, SERVER_NONCE);
        assert_eq!(req.p, vec![0x49, 0x4C, 0x55, 0x3B]);
        assert_eq!(req.q, vec![0x53, 0x91, 0x10, 0x73]);
        assert_eq!(req.encrypted_data.len(), 256);
        assert!(known_key_fingerprints().contains(&req.public_key_fingerprint));
        assert_eq!(0x494C553Bu64 * 0x53911073, PQ);
    }

    #[test]
    fn step2_is_deterministic_given_randomness() {
        let (_, s1a) = do_step1(&CLIENT_NONCE);
        let (_, s1b) = do_step1(&CLIENT_NONCE);
        let (req_a, _) = do_step2(s1a, sample_res_pq(), &step2_random()).unwrap();
        let (req_b, _) = do_step2(s1b, sample_res_pq(), &step2_random()).unwrap();
        assert_eq!(req_a, req_b);
    }

    #[test]
    fn mismatched_nonce_aborts_round_two() {
        let (_, s1) = do_step1(&[0u8; 16]);
        let err = do_step2(s1, sample_res_pq(), &step2_random()).unwrap_err();
        assert!(matches!(err, Error::InvalidNonce { .. }));
    }

    #[test]
    fn negotiator_rejects_out_of_order_step() {
        let mut neg = Negotiator::new();
        assert!(matches!(neg.step(&[]), Err(Error::OutOfOrder)));
    }

    #[test]
    fn full_handshake_against_scripted_server() {
        // Client rounds 1 and 2 with fixed randomness.
        let (_, s1) = do_step1(&CLIENT_NONCE);
        let random2 = step2_random();
        let mut new_nonce = [0u8; 32];
        new_nonce.copy_from_slice(&random2[..32]);
        let (_, s2) = do_step2(s1, sample_res_pq(), &random2).unwrap();

        // Server side: any odd 2048-bit modulus passes the range checks.
        let one = BigUint::from(1u32);
        let dh_prime = (&one << 2048u32) - BigUint::from(159u32);
        let g = BigUint::from(3u32);
        let a = BigUint::from_bytes_be(&[0x5A; 256]);
        let g_a = g.modpow(&a, &dh_prime);
        let server_time = 1_500_000_000;

        let inner = enums::ServerDhInnerData::ServerDhInnerData(types::ServerDhInnerData {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            g: 3,
            dh_prime: dh_prime.to_bytes_be(),
            g_a: g_a.to_bytes_be(),
            server_time,
        })
        .to_bytes();

        let digest: [u8; 20] = {
            let mut sha = Sha1::new();
            sha.update(&inner);
            sha.finalize().into()
        };
        let mut answer = Vec::new();
        answer.extend_from_slice(&digest);
        answer.extend_from_slice(&inner);
        while answer.len() % 16 != 0 {
            answer.push(0);
        }
        let (tmp_key, tmp_iv) = generate_key_data_from_nonce(&SERVER_NONCE, &new_nonce);
        aes::ige_encrypt(&mut answer, &tmp_key, &tmp_iv);

        let dh_params = enums::ServerDhParams::Ok(types::ServerDhParamsOk {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            encrypted_answer: answer,
        });

        // Client round 3.
        let random3: [u8; 272] = core::array::from_fn(|i| (i * 7 + 1) as u8);
        let now = server_time - 2;
        let (req3, s3) = do_step3(s2, dh_params, &random3, now).unwrap();
        assert_eq!(s3.time_offset, 2);

        // Server decrypts the client's answer and finishes its DH side.
        let mut client_answer = req3.encrypted_data.clone();
        aes::ige_decrypt(&mut client_answer, &tmp_key, &tmp_iv);
        let mut cursor = Cursor::from_slice(&client_answer[20..]);
        let enums::ClientDhInnerData::ClientDhInnerData(client_inner) =
            enums::ClientDhInnerData::deserialize(&mut cursor).unwrap();
        assert_eq!(client_inner.retry_id, 0);

        let g_b = BigUint::from_bytes_be(&client_inner.g_b);
        let shared = g_b.modpow(&a, &dh_prime);
        let mut server_key = [0u8; 256];
        let shared_bytes = shared.to_bytes_be();
        server_key[256 - shared_bytes.len()..].copy_from_slice(&shared_bytes);
        let server_auth_key = AuthKey::from_bytes(server_key);

        let ok = enums::SetClientDhParamsAnswer::DhGenOk(types::DhGenOk {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            new_nonce_hash1: server_auth_key.calc_new_nonce_hash(&new_nonce, 1),
        });

        let done = finish(&s3, ok).unwrap();

        // Both sides agree on the key; the derived identifiers line up.
        assert_eq!(done.auth_key, server_key);
        assert_eq!(done.auth_id, AuthKey::from_bytes(done.auth_key).auth_id());
        assert_eq!(done.time_offset, 2);
        let mut expected_salt = [0u8; 8];
        for ((dst, a), b) in expected_salt.iter_mut().zip(&new_nonce[..8]).zip(&SERVER_NONCE[..8]) {
            *dst = a ^ b;
        }
        assert_eq!(done.first_salt, i64::from_le_bytes(expected_salt));
    }

    #[test]
    fn wrong_new_nonce_hash_is_rejected() {
        let one = BigUint::from(1u32);
        let s3 = Step3 {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            new_nonce: [9; 32],
            g: BigUint::from(3u32),
            dh_prime: (&one << 2048u32) - BigUint::from(159u32),
            g_a: BigUint::from(5u32),
            tmp_aes_key: [0; 32],
            tmp_aes_iv: [0; 32],
            gab: BigUint::from(7u32),
            time_offset: 0,
            retry_id: 0,
        };
        let bad = enums::SetClientDhParamsAnswer::DhGenOk(types::DhGenOk {
            nonce: CLIENT_NONCE,
            server_nonce: SERVER_NONCE,
            new_nonce_hash1: [0xFF; 16],
        });
        assert!(matches!(finish(&s3, bad), Err(Error::InvalidNewNonceHash { .. })));
    }
}
