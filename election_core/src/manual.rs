/*!

This is the long-form manual for `election_core` and the `election` command.

## Commands

Every invocation prints exactly one JSON document on the standard output and
exits with status 0, whatever the outcome.

| Command | Output |
|---------|--------|
| `election add <id> <name...>` | `{"ok":true,"msg":"candidate_added"}` |
| `election vote <voterId> <candidateId>` | `{"ok":true,"msg":"vote_recorded"}` |
| `election list_candidates` | `{"candidates":[{"id":1,"name":"Alice","votes":0}]}` |
| `election list_votes` | `{"votes":[{"voter":10,"candidate":1}]}` |
| `election results` | `{"candidates":[...],"winner":{"id":1,"name":"Alice","votes":3}}` |
| `election reset` | `{"ok":true}` |

The name given to `add` may span several arguments. They are joined with
single spaces.

When an operation is refused, the output is `{"ok":false,"msg":"<reason>"}`
with one of the following reasons:

* `exists` a candidate with this id is already registered
* `candidate_not_found` the vote refers to an unknown candidate
* `duplicate_voter` this voter has already voted
* `invalid_id` an identifier is not an integer
* `io_error` a store file could not be read or written
* `invalid_command` the command or its arguments are not understood
* `usage` no command was given

Identifiers and names may start with a dash (`add -3 -Minus`), so a short
flag such as `-h` after `add <id>` is stored as part of the name. The long
`--help` flag is still recognised there and prints the help text instead.
Pass global options before the command.

## Results

The tally of a candidate is the number of votes that refer to its id. The
winner is the candidate with the strictly highest tally. When several
candidates share the highest tally, the one registered first wins. There is
no winner (`null`) when no candidate is registered.

## Files

Two files are kept in the data directory (the current directory by default,
see `--data-dir` and `ELECTION_DATA_DIR`):

* `candidates.csv` with lines `id,name`
* `votes.csv` with lines `voterId,candidateId`

Lines without a comma, or with an identifier that is not an integer, are
ignored. Names are stored with commas replaced by spaces, cut at the first
line break and capped at 255 bytes.

`reset` deletes both files.

## Concurrency

No locking is performed. Running several commands at the same time against
the same data directory may record a duplicate voter or candidate.

*/
