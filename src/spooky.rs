//! SpookyHash V2 (Bob Jenkins), 128-bit state with a 32-bit convenience
//! output.
//!
//! Messages shorter than [`BUF_SIZE`] take the four-lane short path; longer
//! ones are consumed in 96-byte blocks over twelve lanes. All reads are
//! little-endian regardless of target.

const SC_CONST: u64 = 0xdead_beef_dead_beef;
const NUM_VARS: usize = 12;
const BLOCK_SIZE: usize = NUM_VARS * 8;
const BUF_SIZE: usize = 2 * BLOCK_SIZE;

#[inline(always)]
fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}

/// Little-endian read of up to eight bytes, zero-padded.
#[inline(always)]
fn read_partial(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

/// 32-bit SpookyHash of `message` with `seed` used for both halves of the
/// 128-bit seed.
pub fn hash32(message: &[u8], seed: u32) -> u32 {
    let (h1, _) = hash128(message, seed as u64, seed as u64);
    h1 as u32
}

/// 128-bit SpookyHash of `message`, returned as its two 64-bit halves.
pub fn hash128(message: &[u8], seed1: u64, seed2: u64) -> (u64, u64) {
    if message.len() < BUF_SIZE {
        return short(message, seed1, seed2);
    }

    let mut h = [0u64; NUM_VARS];
    for lane in (0..NUM_VARS).step_by(3) {
        h[lane] = seed1;
        h[lane + 1] = seed2;
        h[lane + 2] = SC_CONST;
    }

    let mut blocks = message.chunks_exact(BLOCK_SIZE);
    let mut data = [0u64; NUM_VARS];
    for block in &mut blocks {
        for (word, chunk) in data.iter_mut().zip(block.chunks_exact(8)) {
            *word = read_u64(chunk);
        }
        mix(&data, &mut h);
    }

    let remainder = blocks.remainder();
    let mut last = [0u8; BLOCK_SIZE];
    last[..remainder.len()].copy_from_slice(remainder);
    last[BLOCK_SIZE - 1] = remainder.len() as u8;
    for (word, chunk) in data.iter_mut().zip(last.chunks_exact(8)) {
        *word = read_u64(chunk);
    }
    end(&data, &mut h);

    (h[0], h[1])
}

fn short(message: &[u8], seed1: u64, seed2: u64) -> (u64, u64) {
    let length = message.len();
    let mut a = seed1;
    let mut b = seed2;
    let mut c = SC_CONST;
    let mut d = SC_CONST;

    let mut rest = message;
    if length > 15 {
        let mut chunks = rest.chunks_exact(32);
        for chunk in &mut chunks {
            c = c.wrapping_add(read_u64(&chunk[0..]));
            d = d.wrapping_add(read_u64(&chunk[8..]));
            short_mix(&mut a, &mut b, &mut c, &mut d);
            a = a.wrapping_add(read_u64(&chunk[16..]));
            b = b.wrapping_add(read_u64(&chunk[24..]));
        }
        rest = chunks.remainder();

        if rest.len() >= 16 {
            c = c.wrapping_add(read_u64(&rest[0..]));
            d = d.wrapping_add(read_u64(&rest[8..]));
            short_mix(&mut a, &mut b, &mut c, &mut d);
            rest = &rest[16..];
        }
    }

    d = d.wrapping_add((length as u64) << 56);
    if rest.is_empty() {
        c = c.wrapping_add(SC_CONST);
        d = d.wrapping_add(SC_CONST);
    } else {
        let split = rest.len().min(8);
        c = c.wrapping_add(read_partial(&rest[..split]));
        d = d.wrapping_add(read_partial(&rest[split..]));
    }

    short_end(&mut a, &mut b, &mut c, &mut d);
    (a, b)
}

#[inline(always)]
fn short_mix(h0: &mut u64, h1: &mut u64, h2: &mut u64, h3: &mut u64) {
    *h2 = h2.rotate_left(50);
    *h2 = h2.wrapping_add(*h3);
    *h0 ^= *h2;
    *h3 = h3.rotate_left(52);
    *h3 = h3.wrapping_add(*h0);
    *h1 ^= *h3;
    *h0 = h0.rotate_left(30);
    *h0 = h0.wrapping_add(*h1);
    *h2 ^= *h0;
    *h1 = h1.rotate_left(41);
    *h1 = h1.wrapping_add(*h2);
    *h3 ^= *h1;
    *h2 = h2.rotate_left(54);
    *h2 = h2.wrapping_add(*h3);
    *h0 ^= *h2;
    *h3 = h3.rotate_left(48);
    *h3 = h3.wrapping_add(*h0);
    *h1 ^= *h3;
    *h0 = h0.rotate_left(38);
    *h0 = h0.wrapping_add(*h1);
    *h2 ^= *h0;
    *h1 = h1.rotate_left(37);
    *h1 = h1.wrapping_add(*h2);
    *h3 ^= *h1;
    *h2 = h2.rotate_left(62);
    *h2 = h2.wrapping_add(*h3);
    *h0 ^= *h2;
    *h3 = h3.rotate_left(34);
    *h3 = h3.wrapping_add(*h0);
    *h1 ^= *h3;
    *h0 = h0.rotate_left(5);
    *h0 = h0.wrapping_add(*h1);
    *h2 ^= *h0;
    *h1 = h1.rotate_left(36);
    *h1 = h1.wrapping_add(*h2);
    *h3 ^= *h1;
}

#[inline(always)]
fn short_end(h0: &mut u64, h1: &mut u64, h2: &mut u64, h3: &mut u64) {
    const ROUNDS: [(usize, usize, u32); 11] = [
        (3, 2, 15),
        (0, 3, 52),
        (1, 0, 26),
        (2, 1, 51),
        (3, 2, 28),
        (0, 3, 9),
        (1, 0, 47),
        (2, 1, 54),
        (3, 2, 32),
        (0, 3, 25),
        (1, 0, 63),
    ];

    let mut h = [*h0, *h1, *h2, *h3];
    // h[dst] ^= h[src]; h[src] = rot(h[src], k); h[dst] += h[src]
    for (dst, src, k) in ROUNDS {
        h[dst] ^= h[src];
        h[src] = h[src].rotate_left(k);
        h[dst] = h[dst].wrapping_add(h[src]);
    }
    *h0 = h[0];
    *h1 = h[1];
    *h2 = h[2];
    *h3 = h[3];
}

#[inline(always)]
fn mix(data: &[u64; NUM_VARS], s: &mut [u64; NUM_VARS]) {
    const ROT: [u32; NUM_VARS] = [11, 32, 43, 31, 17, 28, 39, 57, 55, 54, 22, 46];

    // Lane i: s[i] += data[i]; s[i+2] ^= s[i+10]; s[i+11] ^= s[i];
    //         s[i] = rot(s[i]); s[i+11] += s[i+1]  (indices mod 12)
    for i in 0..NUM_VARS {
        s[i] = s[i].wrapping_add(data[i]);
        s[(i + 2) % NUM_VARS] ^= s[(i + 10) % NUM_VARS];
        s[(i + 11) % NUM_VARS] ^= s[i];
        s[i] = s[i].rotate_left(ROT[i]);
        s[(i + 11) % NUM_VARS] = s[(i + 11) % NUM_VARS].wrapping_add(s[(i + 1) % NUM_VARS]);
    }
}

#[inline(always)]
fn end_partial(h: &mut [u64; NUM_VARS]) {
    const ROT: [u32; NUM_VARS] = [44, 15, 34, 21, 38, 33, 10, 13, 38, 53, 42, 54];

    // Step i: h[i+11] += h[i+1]; h[i+2] ^= h[i+11]; h[i+1] = rot(h[i+1])
    for i in 0..NUM_VARS {
        let a = (i + 11) % NUM_VARS;
        let b = (i + 1) % NUM_VARS;
        let c = (i + 2) % NUM_VARS;
        h[a] = h[a].wrapping_add(h[b]);
        h[c] ^= h[a];
        h[b] = h[b].rotate_left(ROT[i]);
    }
}

#[inline(always)]
fn end(data: &[u64; NUM_VARS], h: &mut [u64; NUM_VARS]) {
    for (lane, word) in h.iter_mut().zip(data) {
        *lane = lane.wrapping_add(*word);
    }
    end_partial(h);
    end_partial(h);
    end_partial(h);
}
